use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ListingId(Uuid);

impl ListingId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}

impl From<ListingId> for Uuid {
    fn from(value: ListingId) -> Self {
        value.0
    }
}

impl AsRef<Uuid> for ListingId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}
