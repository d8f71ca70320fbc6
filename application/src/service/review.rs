use error_stack::Report;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{DependOnListingQuery, DependOnReviewQuery, ListingQuery, ReviewQuery};
use kernel::interface::update::{
    DependOnListingModifier, DependOnReviewModifier, ListingModifier, ReviewModifier,
};
use kernel::prelude::entity::{
    CreatedAt, ListingId, Review, ReviewComment, ReviewId, ReviewScore, UserId,
};
use kernel::KernelError;

use crate::service::{is_conflict, RETRY_ATTEMPTS};
use crate::transfer::{GetListingReviewsDto, ReviewDto, SubmitReviewDto};

#[async_trait::async_trait]
pub trait SubmitReviewService<Connection: Transaction + Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnListingQuery<Connection>
    + DependOnListingModifier<Connection>
    + DependOnReviewModifier<Connection>
{
    /// Writes the review and folds its score into the listing's running
    /// mean in one transaction. The aggregate update runs under the
    /// listing's revision guard; a losing writer retries from a fresh read
    /// of the listing, so every accepted review is counted exactly once.
    async fn submit_review(
        &self,
        dto: SubmitReviewDto,
    ) -> error_stack::Result<Uuid, KernelError> {
        let score = ReviewScore::new(dto.score);
        if !score.in_range() {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("score must lie in 1..=5"));
        }

        let listing_id = ListingId::new(dto.listing_id);
        let uuid = Uuid::new_v4();

        for _ in 0..RETRY_ATTEMPTS {
            let mut connection = self.database_connection().transact().await?;
            let listing = self
                .listing_query()
                .find_by_id(&mut connection, &listing_id)
                .await?
                .ok_or_else(|| Report::new(KernelError::NotFound))?;

            let review = Review::new(
                ReviewId::new(uuid),
                listing_id.clone(),
                UserId::new(dto.reviewer_id),
                score.clone(),
                ReviewComment::new(dto.comment.clone()),
                CreatedAt::new(OffsetDateTime::now_utc()),
            );
            self.review_modifier().create(&mut connection, &review).await?;

            let rated = listing.rate(&score);
            let written = self
                .listing_modifier()
                .update(&mut connection, &rated)
                .await;
            if is_conflict(&written) {
                tracing::debug!(listing = %dto.listing_id, "aggregate lost a revision race, retrying");
                connection.roll_back().await?;
                continue;
            }
            written?;

            let committed = connection.commit().await;
            if is_conflict(&committed) {
                tracing::debug!(listing = %dto.listing_id, "aggregate conflicted at commit, retrying");
                continue;
            }
            committed?;
            return Ok(uuid);
        }

        tracing::warn!(listing = %dto.listing_id, "review retry budget exhausted");
        Err(Report::new(KernelError::Transient).attach_printable("review retry budget exhausted"))
    }
}

impl<Connection: Transaction + Send, T> SubmitReviewService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnListingQuery<Connection>
        + DependOnListingModifier<Connection>
        + DependOnReviewModifier<Connection>
{
}

#[async_trait::async_trait]
pub trait ListingReviewsService<Connection: Transaction + Send>:
    'static + Sync + Send + DependOnDatabaseConnection<Connection> + DependOnReviewQuery<Connection>
{
    async fn listing_reviews(
        &self,
        dto: GetListingReviewsDto,
    ) -> error_stack::Result<Vec<ReviewDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let listing_id = ListingId::new(dto.listing_id);
        let reviews = self
            .review_query()
            .find_by_listing(&mut connection, &listing_id)
            .await?;

        Ok(reviews.into_iter().map(ReviewDto::from).collect())
    }
}

impl<Connection: Transaction + Send, T> ListingReviewsService<Connection> for T where
    T: DependOnDatabaseConnection<Connection> + DependOnReviewQuery<Connection>
{
}
