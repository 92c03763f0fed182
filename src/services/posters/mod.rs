//! Remote poster source abstraction
//!
//! A source answers one question: given a movie id, what relative image path does
//! the metadata endpoint report for it? Composing the final URL and deciding how to
//! degrade on failure belong to the callers (the serving-time resolver and the
//! offline cache build), which use different timeouts against the same source.

use crate::{error::AppResult, models::ItemId};

pub mod tmdb;

pub use tmdb::TmdbPosterSource;

/// Trait for poster metadata sources
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterSource: Send + Sync {
    /// Fetch the relative poster path for a movie
    ///
    /// `Ok(None)` means the source answered but has no usable image. Network,
    /// timeout and HTTP status failures are errors.
    async fn fetch_poster_path(&self, id: ItemId) -> AppResult<Option<String>>;

    /// Source name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Joins an image base and a relative path with exactly one `/` between them
pub fn compose_image_url(base: &str, relative: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_image_url_single_separator() {
        let expected = "https://image.tmdb.org/t/p/w500/abc.jpg";
        assert_eq!(
            compose_image_url("https://image.tmdb.org/t/p/w500", "/abc.jpg"),
            expected
        );
        assert_eq!(
            compose_image_url("https://image.tmdb.org/t/p/w500/", "/abc.jpg"),
            expected
        );
        assert_eq!(
            compose_image_url("https://image.tmdb.org/t/p/w500", "abc.jpg"),
            expected
        );
    }
}
