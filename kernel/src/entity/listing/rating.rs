use serde::{Deserialize, Serialize};

use crate::entity::review::ReviewScore;

/// Running mean over all submitted review scores.
///
/// Invariant: `average` equals the true mean of every score ever applied
/// and `count` the number of applications. No rounding here; formatting is
/// a display concern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    average: f64,
    count: i32,
}

impl Rating {
    pub fn new(average: f64, count: i32) -> Self {
        Self { average, count }
    }

    pub fn average(&self) -> f64 {
        self.average
    }

    pub fn count(&self) -> i32 {
        self.count
    }

    pub fn apply(&self, score: &ReviewScore) -> Self {
        let count = self.count + 1;
        let total = self.average * f64::from(self.count) + f64::from(*score.as_ref());
        Self {
            average: total / f64::from(count),
            count,
        }
    }
}
