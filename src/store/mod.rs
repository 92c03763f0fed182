//! Read-only artifacts loaded at startup and the persisted poster cache.

pub mod catalog;
pub mod poster_cache;
pub mod similarity;

pub use catalog::Catalog;
pub use poster_cache::{PosterCache, ServingMode};
pub use similarity::{validate_alignment, SimilarityIndex};
