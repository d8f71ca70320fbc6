use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{DependOnListingQuery, ListingQuery};
use kernel::prelude::entity::ListingId;
use kernel::KernelError;

use crate::transfer::{GetListingDto, ListingDto};

#[async_trait::async_trait]
pub trait GetListingService<Connection: Transaction + Send>:
    'static + Sync + Send + DependOnDatabaseConnection<Connection> + DependOnListingQuery<Connection>
{
    async fn get_listing(
        &self,
        dto: GetListingDto,
    ) -> error_stack::Result<Option<ListingDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = ListingId::new(dto.id);
        let listing = self.listing_query().find_by_id(&mut connection, &id).await?;

        Ok(listing.map(ListingDto::from))
    }
}

impl<Connection: Transaction + Send, T> GetListingService<Connection> for T where
    T: DependOnDatabaseConnection<Connection> + DependOnListingQuery<Connection>
{
}
