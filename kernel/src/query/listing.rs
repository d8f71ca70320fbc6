use crate::database::Transaction;
use crate::entity::{Listing, ListingId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait ListingQuery<Connection: Transaction>: Sync + Send + 'static {
    async fn find_by_id(
        &self,
        con: &mut Connection,
        id: &ListingId,
    ) -> error_stack::Result<Option<Listing>, KernelError>;
}

pub trait DependOnListingQuery<Connection: Transaction>: Sync + Send + 'static {
    type ListingQuery: ListingQuery<Connection>;
    fn listing_query(&self) -> &Self::ListingQuery;
}
