use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::Review;

#[derive(Debug, Clone)]
pub struct ReviewDto {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub reviewer: Uuid,
    pub score: i32,
    pub comment: String,
    pub created_at: OffsetDateTime,
}

impl From<Review> for ReviewDto {
    fn from(value: Review) -> Self {
        Self {
            id: *value.id().as_ref(),
            listing_id: *value.listing_id().as_ref(),
            reviewer: *value.reviewer().as_ref(),
            score: *value.score().as_ref(),
            comment: value.comment().as_ref().to_string(),
            created_at: *value.created_at().as_ref(),
        }
    }
}

pub struct SubmitReviewDto {
    pub listing_id: Uuid,
    pub reviewer_id: Uuid,
    pub score: i32,
    pub comment: String,
}

pub struct GetListingReviewsDto {
    pub listing_id: Uuid,
}
