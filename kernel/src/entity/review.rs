mod comment;
mod id;
mod score;

pub use self::{comment::*, id::*, score::*};
use serde::{Deserialize, Serialize};

use crate::entity::common::CreatedAt;
use crate::entity::listing::ListingId;
use crate::entity::user::UserId;

/// Append-only review document; the listing aggregate is updated in the
/// same transaction that writes this.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Review {
    id: ReviewId,
    listing_id: ListingId,
    reviewer: UserId,
    score: ReviewScore,
    comment: ReviewComment,
    created_at: CreatedAt<Review>,
}

impl Review {
    pub fn new(
        id: ReviewId,
        listing_id: ListingId,
        reviewer: UserId,
        score: ReviewScore,
        comment: ReviewComment,
        created_at: CreatedAt<Review>,
    ) -> Self {
        Self {
            id,
            listing_id,
            reviewer,
            score,
            comment,
            created_at,
        }
    }

    pub fn id(&self) -> &ReviewId {
        &self.id
    }

    pub fn listing_id(&self) -> &ListingId {
        &self.listing_id
    }

    pub fn reviewer(&self) -> &UserId {
        &self.reviewer
    }

    pub fn score(&self) -> &ReviewScore {
        &self.score
    }

    pub fn comment(&self) -> &ReviewComment {
        &self.comment
    }

    pub fn created_at(&self) -> &CreatedAt<Review> {
        &self.created_at
    }
}
