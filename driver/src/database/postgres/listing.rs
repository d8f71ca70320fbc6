use error_stack::Report;
use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::ListingQuery;
use kernel::interface::update::ListingModifier;
use kernel::prelude::entity::{Listing, ListingId, Rating, Revision};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresListingRepository;

#[async_trait::async_trait]
impl ListingQuery<PostgresTransaction> for PostgresListingRepository {
    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &ListingId,
    ) -> error_stack::Result<Option<Listing>, KernelError> {
        PgListingInternal::find_by_id(con.connection(), id).await
    }
}

#[async_trait::async_trait]
impl ListingModifier<PostgresTransaction> for PostgresListingRepository {
    async fn create(
        &self,
        con: &mut PostgresTransaction,
        listing: &Listing,
    ) -> error_stack::Result<(), KernelError> {
        PgListingInternal::create(con.connection(), listing).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        listing: &Listing,
    ) -> error_stack::Result<(), KernelError> {
        PgListingInternal::update(con.connection(), listing).await
    }
}

#[derive(sqlx::FromRow)]
struct ListingRow {
    id: Uuid,
    rating_average: f64,
    rating_count: i32,
    version: i64,
}

impl From<ListingRow> for Listing {
    fn from(value: ListingRow) -> Self {
        Listing::new(
            ListingId::new(value.id),
            Rating::new(value.rating_average, value.rating_count),
            Revision::new(value.version),
        )
    }
}

pub(in crate::database) struct PgListingInternal;

impl PgListingInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &ListingId,
    ) -> error_stack::Result<Option<Listing>, KernelError> {
        let row = sqlx::query_as::<_, ListingRow>(
            // language=postgresql
            r#"
            SELECT id, rating_average, rating_count, version
            FROM listings
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Listing::from))
    }

    async fn create(
        con: &mut PgConnection,
        listing: &Listing,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO listings (id, rating_average, rating_count, version)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(listing.id().as_ref())
        .bind(listing.rating().average())
        .bind(listing.rating().count())
        .bind(listing.version().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(
        con: &mut PgConnection,
        listing: &Listing,
    ) -> error_stack::Result<(), KernelError> {
        let next = listing.version().next();
        // language=postgresql
        let result = sqlx::query(
            r#"
            UPDATE listings
            SET rating_average = $2, rating_count = $3, version = $4
            WHERE id = $1 AND version = $5
            "#,
        )
        .bind(listing.id().as_ref())
        .bind(listing.rating().average())
        .bind(listing.rating().count())
        .bind(*next.as_ref())
        .bind(listing.version().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Report::new(KernelError::Conflict)
                .attach_printable("listing revision advanced by a concurrent writer"));
        }
        Ok(())
    }
}
