use error_stack::ResultExt;

use kernel::interface::query::ReviewQuery;
use kernel::interface::update::ReviewModifier;
use kernel::prelude::entity::{ListingId, Review};
use kernel::KernelError;

use crate::database::memory::{Document, MemoryTransaction, Write};

pub(in crate::database) static REVIEW_COLLECTION: &str = "reviews";

pub struct MemoryReviewRepository;

#[async_trait::async_trait]
impl ReviewQuery<MemoryTransaction> for MemoryReviewRepository {
    async fn find_by_listing(
        &self,
        con: &mut MemoryTransaction,
        listing_id: &ListingId,
    ) -> error_stack::Result<Vec<Review>, KernelError> {
        let reviews = con
            .read_all(REVIEW_COLLECTION)
            .iter()
            .map(decode)
            .collect::<error_stack::Result<Vec<Review>, KernelError>>()?;
        Ok(reviews
            .into_iter()
            .filter(|review| review.listing_id() == listing_id)
            .collect())
    }
}

#[async_trait::async_trait]
impl ReviewModifier<MemoryTransaction> for MemoryReviewRepository {
    async fn create(
        &self,
        con: &mut MemoryTransaction,
        review: &Review,
    ) -> error_stack::Result<(), KernelError> {
        let body = serde_json::to_value(review).change_context(KernelError::Internal)?;
        con.push(Write::Insert {
            collection: REVIEW_COLLECTION,
            id: *review.id().as_ref(),
            document: Document { version: 0, body },
        });
        Ok(())
    }
}

fn decode(document: &Document) -> error_stack::Result<Review, KernelError> {
    serde_json::from_value(document.body.clone())
        .change_context(KernelError::Internal)
        .attach_printable("malformed review document")
}
