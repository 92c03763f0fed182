pub mod item;
pub mod poster;
pub mod recommendation;

pub use item::{Item, ItemId};
pub use poster::{PosterResolution, PosterTier, FAILURE_PLACEHOLDER_URL, NO_POSTER_PLACEHOLDER_URL};
pub use recommendation::{Recommendation, RecommendationResponse};
