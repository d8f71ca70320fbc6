use std::fmt::Display;

use error_stack::Context;
use uuid::Uuid;

/// Caller-facing failure kinds for every ledger operation.
///
/// Store-level failures are converted into one of these at the driver
/// boundary; callers never observe raw backend errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// The referenced document does not exist.
    NotFound,
    /// The voucher already has a claimant. Carries the current claimant so
    /// that a caller retrying its own claim can recognize it as settled.
    AlreadyClaimed { claimed_by: Uuid },
    /// The user already redeemed this single-use voucher.
    AlreadyRedeemed,
    /// The voucher reached its usage limit.
    LimitExceeded,
    /// Rejected input, e.g. a negative discount or an out-of-range score.
    Validation,
    /// A revision-guarded write lost a race against a concurrent commit.
    /// Consumed by the service retry loops; becomes `Transient` once the
    /// retry budget runs out.
    Conflict,
    /// Network or store failure. Retrying `claim`/`redeem` with the same
    /// arguments is safe; retrying voucher creation is not.
    Transient,
    /// Malformed stored document or a driver bug.
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::NotFound => write!(f, "Document not found"),
            KernelError::AlreadyClaimed { claimed_by } => {
                write!(f, "Voucher already claimed by {claimed_by}")
            }
            KernelError::AlreadyRedeemed => write!(f, "Voucher already redeemed by this user"),
            KernelError::LimitExceeded => write!(f, "Voucher usage limit exceeded"),
            KernelError::Validation => write!(f, "Invalid input"),
            KernelError::Conflict => write!(f, "Concurrent revision conflict"),
            KernelError::Transient => write!(f, "Transient store failure"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}
