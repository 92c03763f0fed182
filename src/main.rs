use std::sync::Arc;

use anyhow::Context;
use cinematch::{
    api::{create_router, AppState},
    config::Config,
    services::{PosterResolver, TmdbPosterSource},
    store::{validate_alignment, Catalog, PosterCache, ServingMode, SimilarityIndex},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cinematch::init_tracing();

    let config = Config::from_env()?;

    // Core artifacts are required; a failure here halts before serving anything
    let catalog = Catalog::load(&config.catalog_path)
        .await
        .context("Model files not found or unreadable; build the catalog artifact first")?;
    let similarity = SimilarityIndex::load(&config.similarity_path)
        .await
        .context("Model files not found or unreadable; build the similarity artifact first")?;
    validate_alignment(&catalog, &similarity)
        .context("Catalog and similarity artifacts are out of sync")?;

    let poster_cache = PosterCache::load_snapshot(&config.poster_cache_path)
        .await
        .context("Poster cache snapshot exists but could not be loaded")?;

    let source = TmdbPosterSource::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.live_lookup_timeout(),
    );
    let resolver = PosterResolver::new(
        poster_cache,
        Arc::new(source),
        config.poster_image_base.clone(),
    );

    match resolver.mode() {
        ServingMode::Hybrid => tracing::info!(
            mode = %resolver.mode(),
            cached_posters = resolver.cached_posters(),
            "Demo mode active: posters served from local cache first"
        ),
        ServingMode::Live => tracing::warn!(
            mode = %resolver.mode(),
            path = %config.poster_cache_path,
            "No poster cache snapshot found: live API mode, some posters may not load on restricted networks"
        ),
    }

    let state = AppState::new(Arc::new(catalog), Arc::new(similarity), Arc::new(resolver));
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
