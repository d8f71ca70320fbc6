use crate::database::Transaction;
use crate::entity::Listing;
use crate::KernelError;

#[async_trait::async_trait]
pub trait ListingModifier<Connection: Transaction>: 'static + Sync + Send {
    async fn create(
        &self,
        con: &mut Connection,
        listing: &Listing,
    ) -> error_stack::Result<(), KernelError>;

    /// Revision-guarded, like the voucher update; the rating aggregate must
    /// never be written over a stale read.
    async fn update(
        &self,
        con: &mut Connection,
        listing: &Listing,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnListingModifier<Connection: Transaction>: 'static + Sync + Send {
    type ListingModifier: ListingModifier<Connection>;
    fn listing_modifier(&self) -> &Self::ListingModifier;
}
