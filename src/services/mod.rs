pub mod cache_builder;
pub mod poster_resolver;
pub mod posters;
pub mod ranking;
pub mod recommendations;

pub use cache_builder::{CacheBuildOptions, CacheBuildReport, CacheBuilder};
pub use poster_resolver::PosterResolver;
pub use posters::{PosterSource, TmdbPosterSource};
pub use recommendations::Recommender;
