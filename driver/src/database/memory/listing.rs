use error_stack::ResultExt;

use kernel::interface::query::ListingQuery;
use kernel::interface::update::ListingModifier;
use kernel::prelude::entity::{Listing, ListingId};
use kernel::KernelError;

use crate::database::memory::{Document, MemoryTransaction, Write};

pub(in crate::database) static LISTING_COLLECTION: &str = "listings";

pub struct MemoryListingRepository;

#[async_trait::async_trait]
impl ListingQuery<MemoryTransaction> for MemoryListingRepository {
    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &ListingId,
    ) -> error_stack::Result<Option<Listing>, KernelError> {
        con.read(LISTING_COLLECTION, id.as_ref())
            .map(|document| decode(&document))
            .transpose()
    }
}

#[async_trait::async_trait]
impl ListingModifier<MemoryTransaction> for MemoryListingRepository {
    async fn create(
        &self,
        con: &mut MemoryTransaction,
        listing: &Listing,
    ) -> error_stack::Result<(), KernelError> {
        con.push(Write::Insert {
            collection: LISTING_COLLECTION,
            id: *listing.id().as_ref(),
            document: encode(listing)?,
        });
        Ok(())
    }

    async fn update(
        &self,
        con: &mut MemoryTransaction,
        listing: &Listing,
    ) -> error_stack::Result<(), KernelError> {
        let advanced = listing.clone().advance();
        con.push(Write::Update {
            collection: LISTING_COLLECTION,
            id: *advanced.id().as_ref(),
            expected: *listing.version().as_ref(),
            document: encode(&advanced)?,
        });
        Ok(())
    }
}

fn encode(listing: &Listing) -> error_stack::Result<Document, KernelError> {
    let body = serde_json::to_value(listing).change_context(KernelError::Internal)?;
    Ok(Document {
        version: *listing.version().as_ref(),
        body,
    })
}

fn decode(document: &Document) -> error_stack::Result<Listing, KernelError> {
    serde_json::from_value(document.body.clone())
        .change_context(KernelError::Internal)
        .attach_printable("malformed listing document")
}
