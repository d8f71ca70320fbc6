use serde::{Deserialize, Serialize};

/// Human-readable campaign code. Uniqueness is a campaign-design
/// convention, not enforced by the model.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct VoucherCode(String);

impl VoucherCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }
}

impl From<VoucherCode> for String {
    fn from(value: VoucherCode) -> Self {
        value.0
    }
}

impl AsRef<str> for VoucherCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
