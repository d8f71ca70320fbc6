use uuid::Uuid;

use kernel::prelude::entity::Listing;

#[derive(Debug, Clone)]
pub struct ListingDto {
    pub id: Uuid,
    pub rating_average: f64,
    pub rating_count: i32,
    pub version: i64,
}

impl From<Listing> for ListingDto {
    fn from(value: Listing) -> Self {
        Self {
            id: *value.id().as_ref(),
            rating_average: value.rating().average(),
            rating_count: value.rating().count(),
            version: *value.version().as_ref(),
        }
    }
}

pub struct GetListingDto {
    pub id: Uuid,
}
