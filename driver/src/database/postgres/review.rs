use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::ReviewQuery;
use kernel::interface::update::ReviewModifier;
use kernel::prelude::entity::{
    CreatedAt, ListingId, Review, ReviewComment, ReviewId, ReviewScore, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresReviewRepository;

#[async_trait::async_trait]
impl ReviewQuery<PostgresTransaction> for PostgresReviewRepository {
    async fn find_by_listing(
        &self,
        con: &mut PostgresTransaction,
        listing_id: &ListingId,
    ) -> error_stack::Result<Vec<Review>, KernelError> {
        PgReviewInternal::find_by_listing(con.connection(), listing_id).await
    }
}

#[async_trait::async_trait]
impl ReviewModifier<PostgresTransaction> for PostgresReviewRepository {
    async fn create(
        &self,
        con: &mut PostgresTransaction,
        review: &Review,
    ) -> error_stack::Result<(), KernelError> {
        PgReviewInternal::create(con.connection(), review).await
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    listing_id: Uuid,
    reviewer: Uuid,
    score: i32,
    comment: String,
    created_at: OffsetDateTime,
}

impl From<ReviewRow> for Review {
    fn from(value: ReviewRow) -> Self {
        Review::new(
            ReviewId::new(value.id),
            ListingId::new(value.listing_id),
            UserId::new(value.reviewer),
            ReviewScore::new(value.score),
            ReviewComment::new(value.comment),
            CreatedAt::new(value.created_at),
        )
    }
}

pub(in crate::database) struct PgReviewInternal;

impl PgReviewInternal {
    async fn find_by_listing(
        con: &mut PgConnection,
        listing_id: &ListingId,
    ) -> error_stack::Result<Vec<Review>, KernelError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            // language=postgresql
            r#"
            SELECT id, listing_id, reviewer, score, comment, created_at
            FROM reviews
            WHERE listing_id = $1
            "#,
        )
        .bind(listing_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn create(
        con: &mut PgConnection,
        review: &Review,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO reviews (id, listing_id, reviewer, score, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(review.id().as_ref())
        .bind(review.listing_id().as_ref())
        .bind(review.reviewer().as_ref())
        .bind(review.score().as_ref())
        .bind(review.comment().as_ref())
        .bind(review.created_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use error_stack::Report;
    use time::OffsetDateTime;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::ReviewQuery;
    use kernel::interface::update::{ListingModifier, ReviewModifier};
    use kernel::prelude::entity::{
        CreatedAt, Listing, ListingId, Rating, Review, ReviewComment, ReviewId, ReviewScore,
        Revision, UserId,
    };
    use kernel::KernelError;

    use crate::database::postgres::{
        PostgresDatabase, PostgresListingRepository, PostgresReviewRepository,
    };

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> Result<(), Report<KernelError>> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let listing_id = ListingId::new(uuid::Uuid::new_v4());
        let listing = Listing::new(listing_id.clone(), Rating::new(0.0, 0), Revision::new(0));
        PostgresListingRepository.create(&mut con, &listing).await?;

        let review = Review::new(
            ReviewId::new(uuid::Uuid::new_v4()),
            listing_id.clone(),
            UserId::new(uuid::Uuid::new_v4()),
            ReviewScore::new(5),
            ReviewComment::new("lovely stay"),
            // whole seconds so the timestamptz round-trip compares equal
            CreatedAt::new(
                OffsetDateTime::from_unix_timestamp(OffsetDateTime::now_utc().unix_timestamp())
                    .expect("in range"),
            ),
        );
        PostgresReviewRepository.create(&mut con, &review).await?;

        let found = PostgresReviewRepository
            .find_by_listing(&mut con, &listing_id)
            .await?;
        assert_eq!(found, vec![review]);

        con.roll_back().await?;
        Ok(())
    }
}
