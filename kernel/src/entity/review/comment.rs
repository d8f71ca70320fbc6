use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReviewComment(String);

impl ReviewComment {
    pub fn new(comment: impl Into<String>) -> Self {
        Self(comment.into())
    }
}

impl From<ReviewComment> for String {
    fn from(value: ReviewComment) -> Self {
        value.0
    }
}

impl AsRef<str> for ReviewComment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
