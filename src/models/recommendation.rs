use serde::{Deserialize, Serialize};

use super::{Item, ItemId, PosterResolution, PosterTier};

/// One ranked neighbor of the selected movie, enriched for display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub item_id: ItemId,
    pub title: String,
    pub poster_url: String,
    pub poster_tier: PosterTier,
    pub year: Option<i32>,
    pub rating: f32,
}

impl Recommendation {
    pub fn new(item: &Item, poster: PosterResolution) -> Self {
        Self {
            item_id: item.id,
            title: item.title.clone(),
            poster_url: poster.url,
            poster_tier: poster.tier,
            year: item.year,
            rating: item.rating,
        }
    }
}

/// Response body for the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub title: String,
    pub recommendations: Vec<Recommendation>,
}
