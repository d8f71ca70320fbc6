use error_stack::Report;
use sqlx::{PgConnection, Pool, Postgres};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::KernelError;

use crate::env;
use crate::error::ConvertError;

pub use self::{listing::*, review::*, voucher::*};

mod listing;
mod review;
mod voucher;

static POSTGRES_URL: &str = "POSTGRES_URL";

pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL)?;
        let pool = Pool::connect(&url).await.convert_error()?;
        tracing::debug!("connected postgres pool");
        Ok(Self { pool })
    }
}

/// One sqlx transaction. Dropping it without commit rolls back on the
/// database side.
pub struct PostgresTransaction(sqlx::Transaction<'static, Postgres>);

impl PostgresTransaction {
    pub(in crate::database) fn connection(&mut self) -> &mut PgConnection {
        &mut self.0
    }
}

#[async_trait::async_trait]
impl DatabaseConnection<PostgresTransaction> for PostgresDatabase {
    async fn transact(&self) -> error_stack::Result<PostgresTransaction, KernelError> {
        let transaction = self.pool.begin().await.convert_error()?;
        Ok(PostgresTransaction(transaction))
    }
}

#[async_trait::async_trait]
impl Transaction for PostgresTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0.commit().await.convert_error()
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.0.rollback().await.convert_error()
    }
}

impl<T> ConvertError for Result<T, sqlx::Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| match error {
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
                Report::from(error).change_context(KernelError::Transient)
            }
            _ => Report::from(error).change_context(KernelError::Internal),
        })
    }
}
