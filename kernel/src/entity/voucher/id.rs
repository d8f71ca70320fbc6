use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct VoucherId(Uuid);

impl VoucherId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}

impl From<VoucherId> for Uuid {
    fn from(value: VoucherId) -> Self {
        value.0
    }
}

impl AsRef<Uuid> for VoucherId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}
