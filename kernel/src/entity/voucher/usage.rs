use serde::{Deserialize, Serialize};

/// Total redemptions allowed. Zero means unlimited, one means single-use.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct UsageLimit(i32);

impl UsageLimit {
    pub fn new(limit: impl Into<i32>) -> Self {
        Self(limit.into())
    }

    pub fn is_unlimited(&self) -> bool {
        self.0 == 0
    }

    pub fn is_single_use(&self) -> bool {
        self.0 == 1
    }
}

impl From<UsageLimit> for i32 {
    fn from(value: UsageLimit) -> Self {
        value.0
    }
}

impl AsRef<i32> for UsageLimit {
    fn as_ref(&self) -> &i32 {
        &self.0
    }
}

/// Monotonically non-decreasing redemption counter.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct RedeemCount(i32);

impl RedeemCount {
    pub fn new(count: impl Into<i32>) -> Self {
        Self(count.into())
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<RedeemCount> for i32 {
    fn from(value: RedeemCount) -> Self {
        value.0
    }
}

impl AsRef<i32> for RedeemCount {
    fn as_ref(&self) -> &i32 {
        &self.0
    }
}
