use crate::database::Transaction;
use crate::entity::{ListingId, Review};
use crate::KernelError;

#[async_trait::async_trait]
pub trait ReviewQuery<Connection: Transaction>: Sync + Send + 'static {
    async fn find_by_listing(
        &self,
        con: &mut Connection,
        listing_id: &ListingId,
    ) -> error_stack::Result<Vec<Review>, KernelError>;
}

pub trait DependOnReviewQuery<Connection: Transaction>: Sync + Send + 'static {
    type ReviewQuery: ReviewQuery<Connection>;
    fn review_query(&self) -> &Self::ReviewQuery;
}
