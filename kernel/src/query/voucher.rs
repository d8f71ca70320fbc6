use time::OffsetDateTime;

use crate::database::Transaction;
use crate::entity::{UserId, Voucher, VoucherId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait VoucherQuery<Connection: Transaction>: Sync + Send + 'static {
    async fn find_by_id(
        &self,
        con: &mut Connection,
        id: &VoucherId,
    ) -> error_stack::Result<Option<Voucher>, KernelError>;

    /// Availability snapshot: active, unexpired at `now`, unclaimed. Runs a
    /// fresh query every call; ordering is backend-defined and callers must
    /// not depend on it.
    async fn find_available(
        &self,
        con: &mut Connection,
        now: &OffsetDateTime,
    ) -> error_stack::Result<Vec<Voucher>, KernelError>;

    async fn find_by_claimer(
        &self,
        con: &mut Connection,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Voucher>, KernelError>;
}

pub trait DependOnVoucherQuery<Connection: Transaction>: Sync + Send + 'static {
    type VoucherQuery: VoucherQuery<Connection>;
    fn voucher_query(&self) -> &Self::VoucherQuery;
}
