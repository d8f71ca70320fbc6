use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidFrom(OffsetDateTime);

impl ValidFrom {
    pub fn new(time: impl Into<OffsetDateTime>) -> Self {
        Self(time.into())
    }
}

impl AsRef<OffsetDateTime> for ValidFrom {
    fn as_ref(&self) -> &OffsetDateTime {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpiresAt(OffsetDateTime);

impl ExpiresAt {
    pub fn new(time: impl Into<OffsetDateTime>) -> Self {
        Self(time.into())
    }
}

impl AsRef<OffsetDateTime> for ExpiresAt {
    fn as_ref(&self) -> &OffsetDateTime {
        &self.0
    }
}
