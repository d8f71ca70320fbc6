mod id;
mod rating;

pub use self::{id::*, rating::*};
use serde::{Deserialize, Serialize};

use crate::entity::common::Revision;
use crate::entity::review::ReviewScore;

/// A bookable homestay or room, carrying its review aggregate. The rating
/// is mutated exclusively through the review-submission transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    id: ListingId,
    rating: Rating,
    version: Revision<Listing>,
}

impl Listing {
    pub fn new(id: ListingId, rating: Rating, version: Revision<Listing>) -> Self {
        Self {
            id,
            rating,
            version,
        }
    }

    pub fn id(&self) -> &ListingId {
        &self.id
    }

    pub fn rating(&self) -> &Rating {
        &self.rating
    }

    pub fn version(&self) -> &Revision<Listing> {
        &self.version
    }

    /// Folds one more review score into the aggregate.
    pub fn rate(self, score: &ReviewScore) -> Self {
        Self {
            rating: self.rating.apply(score),
            ..self
        }
    }

    /// The document as it will be stored after a guarded write.
    pub fn advance(self) -> Self {
        Self {
            version: self.version.next(),
            ..self
        }
    }
}
