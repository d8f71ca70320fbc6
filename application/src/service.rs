pub use self::{listing::*, review::*, voucher::*};

mod listing;
mod review;
mod voucher;

use kernel::KernelError;

/// Transaction attempts per read-modify-write operation. A conflict after
/// the final attempt surfaces as [`KernelError::Transient`].
pub(crate) const RETRY_ATTEMPTS: u32 = 5;

pub(crate) fn is_conflict<T>(result: &error_stack::Result<T, KernelError>) -> bool {
    matches!(result, Err(report) if report.current_context() == &KernelError::Conflict)
}
