use crate::database::Transaction;
use crate::entity::Review;
use crate::KernelError;

/// Reviews are append-only; there is no update or delete.
#[async_trait::async_trait]
pub trait ReviewModifier<Connection: Transaction>: 'static + Sync + Send {
    async fn create(
        &self,
        con: &mut Connection,
        review: &Review,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnReviewModifier<Connection: Transaction>: 'static + Sync + Send {
    type ReviewModifier: ReviewModifier<Connection>;
    fn review_modifier(&self) -> &Self::ReviewModifier;
}
