use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cinematch::{
    config::Config,
    services::{CacheBuildOptions, CacheBuilder, TmdbPosterSource},
    store::{validate_alignment, Catalog, PosterCache, SimilarityIndex},
};

#[derive(Parser, Debug)]
#[command(name = "build-poster-cache")]
#[command(about = "Pre-fetch posters for seed movies and their recommendations")]
#[command(version)]
struct Cli {
    /// Seed titles (defaults to CACHE_SEEDS)
    seeds: Vec<String>,

    /// Look up ids that already have a cached poster
    #[arg(long)]
    refresh: bool,

    /// Start from an empty cache instead of the existing snapshot
    #[arg(long)]
    fresh: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cinematch::init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing::info!("Loading model files");
    let catalog = Catalog::load(&config.catalog_path)
        .await
        .context("Failed to load catalog artifact")?;
    let similarity = SimilarityIndex::load(&config.similarity_path)
        .await
        .context("Failed to load similarity artifact")?;
    validate_alignment(&catalog, &similarity)
        .context("Catalog and similarity artifacts are out of sync")?;

    let existing = if cli.fresh {
        PosterCache::new()
    } else {
        PosterCache::load_snapshot(&config.poster_cache_path)
            .await
            .context("Existing poster cache snapshot could not be loaded")?
            .unwrap_or_default()
    };

    let seeds = if cli.seeds.is_empty() {
        config.cache_seeds.clone()
    } else {
        cli.seeds
    };

    let source = TmdbPosterSource::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.batch_lookup_timeout(),
    );
    let builder = CacheBuilder::new(
        Arc::new(source),
        config.poster_image_base.clone(),
        CacheBuildOptions {
            concurrency: config.batch_concurrency,
            refresh_existing: cli.refresh,
        },
    );

    let (cache, report) = builder
        .run(
            &seeds,
            &catalog,
            &similarity,
            existing,
            &config.poster_cache_path,
        )
        .await
        .context("Failed to save poster cache snapshot")?;

    tracing::info!(
        path = %config.poster_cache_path,
        entries = cache.len(),
        summary = %report,
        "Poster cache ready; the server will start in demo mode"
    );

    if !report.is_complete() {
        tracing::warn!(
            missing = report.attempted - report.cached,
            "Some posters could not be cached; they will fall back to live lookup when served"
        );
    }

    Ok(())
}
