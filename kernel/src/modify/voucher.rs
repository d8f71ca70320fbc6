use crate::database::Transaction;
use crate::entity::Voucher;
use crate::KernelError;

#[async_trait::async_trait]
pub trait VoucherModifier<Connection: Transaction>: 'static + Sync + Send {
    async fn create(
        &self,
        con: &mut Connection,
        voucher: &Voucher,
    ) -> error_stack::Result<(), KernelError>;

    /// Revision-guarded write. The entity carries the revision observed at
    /// read time; the stored document advances to the next revision. Fails
    /// with [`KernelError::Conflict`] when the guard misses.
    async fn update(
        &self,
        con: &mut Connection,
        voucher: &Voucher,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnVoucherModifier<Connection: Transaction>: 'static + Sync + Send {
    type VoucherModifier: VoucherModifier<Connection>;
    fn voucher_modifier(&self) -> &Self::VoucherModifier;
}
