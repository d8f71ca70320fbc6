use serde::{Deserialize, Serialize};

/// Star rating. Valid submissions lie in `1..=5`; the range is checked at
/// the service boundary, not here.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ReviewScore(i32);

impl ReviewScore {
    pub fn new(score: impl Into<i32>) -> Self {
        Self(score.into())
    }

    pub fn in_range(&self) -> bool {
        (1..=5).contains(&self.0)
    }
}

impl From<ReviewScore> for i32 {
    fn from(value: ReviewScore) -> Self {
        value.0
    }
}

impl AsRef<i32> for ReviewScore {
    fn as_ref(&self) -> &i32 {
        &self.0
    }
}
