use serde::{Deserialize, Serialize};

/// Returned when the live lookup failed (network, timeout, HTTP status)
pub const FAILURE_PLACEHOLDER_URL: &str =
    "https://placehold.co/500x750/333/FFFFFF?text=Poster+Not+Available";

/// Returned when the lookup succeeded but the source has no image for the item
pub const NO_POSTER_PLACEHOLDER_URL: &str = "https://placehold.co/500x750/333/FFFFFF?text=No+Poster";

/// Which resolution tier produced a poster URL
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PosterTier {
    /// Served from the poster cache snapshot
    CacheHit,
    /// Fetched from the remote source during this call
    LiveHit,
    /// Remote source answered but had no image path
    NoPosterPlaceholder,
    /// Remote lookup failed
    FailurePlaceholder,
}

impl PosterTier {
    pub fn is_placeholder(self) -> bool {
        matches!(
            self,
            PosterTier::NoPosterPlaceholder | PosterTier::FailurePlaceholder
        )
    }
}

/// Outcome of resolving one item's poster. The URL is never empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PosterResolution {
    pub tier: PosterTier,
    pub url: String,
}

impl PosterResolution {
    pub fn cache_hit(url: impl Into<String>) -> Self {
        Self {
            tier: PosterTier::CacheHit,
            url: url.into(),
        }
    }

    pub fn live_hit(url: impl Into<String>) -> Self {
        Self {
            tier: PosterTier::LiveHit,
            url: url.into(),
        }
    }

    pub fn no_poster() -> Self {
        Self {
            tier: PosterTier::NoPosterPlaceholder,
            url: NO_POSTER_PLACEHOLDER_URL.to_string(),
        }
    }

    pub fn failure() -> Self {
        Self {
            tier: PosterTier::FailurePlaceholder,
            url: FAILURE_PLACEHOLDER_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_are_distinguishable() {
        assert_ne!(FAILURE_PLACEHOLDER_URL, NO_POSTER_PLACEHOLDER_URL);
        assert_eq!(PosterResolution::failure().url, FAILURE_PLACEHOLDER_URL);
        assert_eq!(PosterResolution::no_poster().url, NO_POSTER_PLACEHOLDER_URL);
    }

    #[test]
    fn test_tier_serialization() {
        assert_eq!(
            serde_json::to_string(&PosterTier::NoPosterPlaceholder).unwrap(),
            "\"no_poster_placeholder\""
        );
        assert_eq!(
            serde_json::to_string(&PosterTier::CacheHit).unwrap(),
            "\"cache_hit\""
        );
    }

    #[test]
    fn test_is_placeholder() {
        assert!(PosterTier::FailurePlaceholder.is_placeholder());
        assert!(PosterTier::NoPosterPlaceholder.is_placeholder());
        assert!(!PosterTier::LiveHit.is_placeholder());
        assert!(!PosterTier::CacheHit.is_placeholder());
    }
}
