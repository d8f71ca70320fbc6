use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::KernelError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percentage,
    FixedAmount,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::FixedAmount => "fixed_amount",
        }
    }
}

impl FromStr for DiscountType {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(DiscountType::Percentage),
            "fixed_amount" => Ok(DiscountType::FixedAmount),
            _ => Err(KernelError::Internal),
        }
    }
}

/// Interpreted according to [`DiscountType`]: percent points or a fixed
/// amount in the booking currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountValue(f64);

impl DiscountValue {
    pub fn new(value: impl Into<f64>) -> Self {
        Self(value.into())
    }
}

impl From<DiscountValue> for f64 {
    fn from(value: DiscountValue) -> Self {
        value.0
    }
}

impl AsRef<f64> for DiscountValue {
    fn as_ref(&self) -> &f64 {
        &self.0
    }
}
