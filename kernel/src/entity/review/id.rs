use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ReviewId(Uuid);

impl ReviewId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}

impl From<ReviewId> for Uuid {
    fn from(value: ReviewId) -> Self {
        value.0
    }
}

impl AsRef<Uuid> for ReviewId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}
