use std::sync::Arc;

use crate::{
    models::{ItemId, PosterResolution},
    services::posters::{compose_image_url, PosterSource},
    store::{PosterCache, ServingMode},
};

/// Resolves a poster URL for an item: cache, then live lookup, then placeholder
///
/// Resolution never fails. A failed live lookup degrades to the failure
/// placeholder for that call and is not retried here; retrying is the batch
/// job's concern. The cache handle is shared and never written.
#[derive(Clone)]
pub struct PosterResolver {
    cache: Arc<PosterCache>,
    source: Arc<dyn PosterSource>,
    image_base: String,
    mode: ServingMode,
}

impl PosterResolver {
    /// `cache` is `None` when no snapshot was found at startup (live mode)
    pub fn new(
        cache: Option<PosterCache>,
        source: Arc<dyn PosterSource>,
        image_base: impl Into<String>,
    ) -> Self {
        let mode = if cache.is_some() {
            ServingMode::Hybrid
        } else {
            ServingMode::Live
        };

        Self {
            cache: Arc::new(cache.unwrap_or_default()),
            source,
            image_base: image_base.into(),
            mode,
        }
    }

    pub fn mode(&self) -> ServingMode {
        self.mode
    }

    pub fn cached_posters(&self) -> usize {
        self.cache.len()
    }

    pub async fn resolve(&self, id: ItemId) -> PosterResolution {
        if let Some(url) = self.cache.get(id).filter(|url| !url.trim().is_empty()) {
            tracing::debug!(item_id = %id, "Poster cache hit");
            return PosterResolution::cache_hit(url);
        }

        tracing::debug!(item_id = %id, source = self.source.name(), "Poster cache miss");

        match self.source.fetch_poster_path(id).await {
            Ok(Some(path)) => PosterResolution::live_hit(compose_image_url(&self.image_base, &path)),
            Ok(None) => {
                tracing::debug!(item_id = %id, "Source has no poster for item");
                PosterResolution::no_poster()
            }
            Err(e) => {
                tracing::warn!(item_id = %id, error = %e, "Live poster lookup failed");
                PosterResolution::failure()
            }
        }
    }
}
