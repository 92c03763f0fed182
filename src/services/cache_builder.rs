//! Offline poster cache population
//!
//! Collects the ids of every seed movie and its ranked neighbors, looks up a
//! poster for each through the remote source, and stores the successful URLs so
//! the serving process can run from the snapshot without network access.
//!
//! Per-id failures are isolated: they are logged and counted, never retried
//! within the run, and never abort the batch.

use std::collections::HashSet;
use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::{
    error::AppResult,
    models::ItemId,
    services::{
        posters::{compose_image_url, PosterSource},
        ranking,
    },
    store::{Catalog, PosterCache, SimilarityIndex},
};

/// Tuning for a cache build run
#[derive(Debug, Clone)]
pub struct CacheBuildOptions {
    /// Maximum number of lookups in flight
    pub concurrency: usize,
    /// Look up ids that already have a cached URL instead of keeping them
    pub refresh_existing: bool,
}

impl Default for CacheBuildOptions {
    fn default() -> Self {
        Self {
            concurrency: 8,
            refresh_existing: false,
        }
    }
}

/// Counts for one cache build run
#[derive(Debug, Clone, Serialize)]
pub struct CacheBuildReport {
    pub seeds_total: usize,
    pub unresolved_seeds: Vec<String>,
    /// Distinct ids across all seeds and their neighbors
    pub ids_collected: usize,
    /// Ids skipped because the incoming cache already had them
    pub already_cached: usize,
    pub attempted: usize,
    pub cached: usize,
    pub no_poster: usize,
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CacheBuildReport {
    /// True when every attempted lookup produced a cache entry
    pub fn is_complete(&self) -> bool {
        self.cached == self.attempted
    }

    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

impl Display for CacheBuildReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ids collected, {} already cached (skipped), {} looked up: {} cached, {} without poster, {} failed; {} unresolved seeds",
            self.ids_collected,
            self.already_cached,
            self.attempted,
            self.cached,
            self.no_poster,
            self.failed,
            self.unresolved_seeds.len()
        )
    }
}

enum LookupOutcome {
    Found(String),
    NoPoster,
    Failed,
}

pub struct CacheBuilder {
    source: Arc<dyn PosterSource>,
    image_base: String,
    options: CacheBuildOptions,
}

impl CacheBuilder {
    pub fn new(
        source: Arc<dyn PosterSource>,
        image_base: impl Into<String>,
        options: CacheBuildOptions,
    ) -> Self {
        Self {
            source,
            image_base: image_base.into(),
            options,
        }
    }

    /// Distinct ids of every resolvable seed and its neighbors, plus the seeds
    /// that could not be resolved
    pub fn collect_ids(
        seeds: &[String],
        catalog: &Catalog,
        similarity: &SimilarityIndex,
    ) -> (HashSet<ItemId>, Vec<String>) {
        let mut ids = HashSet::new();
        let mut unresolved = Vec::new();

        for seed in seeds {
            match ranking::seed_item_ids(catalog, similarity, seed) {
                Ok(seed_ids) => ids.extend(seed_ids),
                Err(e) => {
                    tracing::warn!(title = %seed, error = %e, "Seed title not resolvable, skipping");
                    unresolved.push(seed.clone());
                }
            }
        }

        (ids, unresolved)
    }

    /// Populates `cache` with posters for the seeds and their neighbors
    pub async fn build(
        &self,
        seeds: &[String],
        catalog: &Catalog,
        similarity: &SimilarityIndex,
        mut cache: PosterCache,
    ) -> (PosterCache, CacheBuildReport) {
        let started_at = Utc::now();
        let (ids, unresolved_seeds) = Self::collect_ids(seeds, catalog, similarity);
        let ids_collected = ids.len();

        let (mut pending, kept): (Vec<ItemId>, Vec<ItemId>) = ids
            .into_iter()
            .partition(|id| self.options.refresh_existing || !cache.contains(*id));
        pending.sort();

        tracing::info!(
            seeds = seeds.len(),
            ids = ids_collected,
            already_cached = kept.len(),
            to_fetch = pending.len(),
            source = self.source.name(),
            "Fetching posters for cache build"
        );

        let attempted = pending.len();
        let results: Vec<(ItemId, LookupOutcome)> = stream::iter(pending)
            .map(|id| async move { (id, self.lookup(id).await) })
            .buffer_unordered(self.options.concurrency.max(1))
            .collect()
            .await;

        let mut cached = 0;
        let mut no_poster = 0;
        let mut failed = 0;

        for (id, outcome) in results {
            match outcome {
                LookupOutcome::Found(url) => {
                    cache.insert(id, url);
                    cached += 1;
                }
                LookupOutcome::NoPoster => no_poster += 1,
                LookupOutcome::Failed => failed += 1,
            }
        }

        let report = CacheBuildReport {
            seeds_total: seeds.len(),
            unresolved_seeds,
            ids_collected,
            already_cached: kept.len(),
            attempted,
            cached,
            no_poster,
            failed,
            started_at,
            finished_at: Utc::now(),
        };

        if report.is_complete() {
            tracing::info!(
                cached = report.cached,
                attempted = report.attempted,
                elapsed_ms = report.elapsed_ms(),
                "Cache build completed"
            );
        } else {
            tracing::warn!(
                cached = report.cached,
                attempted = report.attempted,
                no_poster = report.no_poster,
                failed = report.failed,
                elapsed_ms = report.elapsed_ms(),
                "Cache build completed with missing posters"
            );
        }

        (cache, report)
    }

    /// Builds and persists the resulting snapshot to `snapshot_path`
    pub async fn run(
        &self,
        seeds: &[String],
        catalog: &Catalog,
        similarity: &SimilarityIndex,
        cache: PosterCache,
        snapshot_path: impl AsRef<Path>,
    ) -> AppResult<(PosterCache, CacheBuildReport)> {
        let (cache, report) = self.build(seeds, catalog, similarity, cache).await;
        cache.save_snapshot(snapshot_path).await?;
        Ok((cache, report))
    }

    async fn lookup(&self, id: ItemId) -> LookupOutcome {
        match self.source.fetch_poster_path(id).await {
            Ok(Some(path)) => LookupOutcome::Found(compose_image_url(&self.image_base, &path)),
            Ok(None) => {
                tracing::debug!(item_id = %id, "No poster available, not caching");
                LookupOutcome::NoPoster
            }
            Err(e) => {
                tracing::warn!(item_id = %id, error = %e, "Skipping item after failed lookup");
                LookupOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, models::Item, services::posters::MockPosterSource};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const IMAGE_BASE: &str = "https://img.test/w500";
    const SIZE: usize = 11;

    /// Rows 0 ("A") and 1 ("B") share neighbor row 6; item ids are 100 + row
    fn fixture() -> (Catalog, SimilarityIndex) {
        let titles = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K"];
        let catalog = Catalog::from_items(
            titles
                .iter()
                .enumerate()
                .map(|(row, title)| Item::new(100 + row as u64, *title, Some(2000), 6.5))
                .collect(),
        );

        let mut rows = vec![vec![0.0f32; SIZE]; SIZE];
        for (i, row) in rows.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        for (col, score) in [(2, 0.9), (3, 0.8), (4, 0.7), (5, 0.6), (6, 0.5)] {
            rows[0][col] = score;
        }
        for (col, score) in [(6, 0.9), (7, 0.8), (8, 0.7), (9, 0.6), (10, 0.5)] {
            rows[1][col] = score;
        }

        (catalog, SimilarityIndex::from_rows(rows).unwrap())
    }

    fn seeds(titles: &[&str]) -> Vec<String> {
        titles.iter().map(|t| t.to_string()).collect()
    }

    fn builder(source: MockPosterSource, options: CacheBuildOptions) -> CacheBuilder {
        let mut source = source;
        source.expect_name().return_const("mock");
        CacheBuilder::new(Arc::new(source), IMAGE_BASE, options)
    }

    #[test]
    fn test_collect_ids_deduplicates_shared_neighbors() {
        let (catalog, similarity) = fixture();
        let (ids, unresolved) = CacheBuilder::collect_ids(&seeds(&["A", "B"]), &catalog, &similarity);

        assert!(unresolved.is_empty());
        assert_eq!(ids.len(), 11);
        assert!(ids.len() <= (1 + 5) * 2);
        assert!(ids.contains(&ItemId(106)));
    }

    #[test]
    fn test_collect_ids_skips_unknown_seed() {
        let (catalog, similarity) = fixture();
        let (ids, unresolved) =
            CacheBuilder::collect_ids(&seeds(&["A", "Nope"]), &catalog, &similarity);

        assert_eq!(ids.len(), 6);
        assert_eq!(unresolved, vec!["Nope".to_string()]);
    }

    #[tokio::test]
    async fn test_build_isolates_failing_id() {
        let (catalog, similarity) = fixture();
        let mut source = MockPosterSource::new();
        source
            .expect_fetch_poster_path()
            .times(11)
            .returning(|id| {
                if id == ItemId(104) {
                    Err(AppError::ExternalApi("status 500".to_string()))
                } else {
                    Ok(Some(format!("/{}.jpg", id)))
                }
            });
        let builder = builder(source, CacheBuildOptions::default());

        let (cache, report) = builder
            .build(&seeds(&["A", "B"]), &catalog, &similarity, PosterCache::new())
            .await;

        assert_eq!(cache.len(), 10);
        assert!(!cache.contains(ItemId(104)));
        assert_eq!(cache.get(ItemId(106)), Some("https://img.test/w500/106.jpg"));
        assert_eq!(report.ids_collected, 11);
        assert_eq!(report.attempted, 11);
        assert_eq!(report.cached, 10);
        assert_eq!(report.failed, 1);
        assert!(!report.is_complete());
    }

    #[tokio::test]
    async fn test_build_does_not_cache_missing_posters() {
        let (catalog, similarity) = fixture();
        let mut source = MockPosterSource::new();
        source.expect_fetch_poster_path().returning(|id| {
            if id == ItemId(100) {
                Ok(None)
            } else {
                Ok(Some("/p.jpg".to_string()))
            }
        });
        let builder = builder(source, CacheBuildOptions::default());

        let (cache, report) = builder
            .build(&seeds(&["A"]), &catalog, &similarity, PosterCache::new())
            .await;

        assert_eq!(cache.len(), 5);
        assert!(!cache.contains(ItemId(100)));
        assert_eq!(report.no_poster, 1);
        assert_eq!(report.failed, 0);
    }

    #[tokio::test]
    async fn test_build_skips_already_cached_ids() {
        let (catalog, similarity) = fixture();
        let mut source = MockPosterSource::new();
        source
            .expect_fetch_poster_path()
            .withf(|id| *id != ItemId(100))
            .times(5)
            .returning(|_| Ok(Some("/p.jpg".to_string())));
        let builder = builder(source, CacheBuildOptions::default());

        let existing: PosterCache = vec![(ItemId(100), "http://example/100.jpg".to_string())]
            .into_iter()
            .collect();
        let (cache, report) = builder
            .build(&seeds(&["A"]), &catalog, &similarity, existing)
            .await;

        assert_eq!(cache.len(), 6);
        assert_eq!(cache.get(ItemId(100)), Some("http://example/100.jpg"));
        assert_eq!(report.already_cached, 1);
        assert_eq!(report.attempted, 5);
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn test_rerun_over_full_cache_reports_skipped_ids() {
        let (catalog, similarity) = fixture();
        let mut source = MockPosterSource::new();
        source.expect_fetch_poster_path().times(0);
        let builder = builder(source, CacheBuildOptions::default());

        let (ids, _) = CacheBuilder::collect_ids(&seeds(&["A"]), &catalog, &similarity);
        let existing: PosterCache = ids
            .iter()
            .map(|id| (*id, format!("http://example/{}.jpg", id)))
            .collect();
        let (cache, report) = builder
            .build(&seeds(&["A"]), &catalog, &similarity, existing)
            .await;

        assert_eq!(cache.len(), 6);
        assert_eq!(report.already_cached, 6);
        assert_eq!(report.attempted, 0);
        assert_eq!(
            report.to_string(),
            "6 ids collected, 6 already cached (skipped), 0 looked up: 0 cached, 0 without poster, 0 failed; 0 unresolved seeds"
        );
    }

    #[tokio::test]
    async fn test_build_refresh_existing_refetches() {
        let (catalog, similarity) = fixture();
        let mut source = MockPosterSource::new();
        source
            .expect_fetch_poster_path()
            .times(6)
            .returning(|_| Ok(Some("/fresh.jpg".to_string())));
        let options = CacheBuildOptions {
            refresh_existing: true,
            ..CacheBuildOptions::default()
        };
        let builder = builder(source, options);

        let existing: PosterCache = vec![(ItemId(100), "http://example/stale.jpg".to_string())]
            .into_iter()
            .collect();
        let (cache, report) = builder
            .build(&seeds(&["A"]), &catalog, &similarity, existing)
            .await;

        assert_eq!(cache.get(ItemId(100)), Some("https://img.test/w500/fresh.jpg"));
        assert_eq!(report.already_cached, 0);
        assert_eq!(report.attempted, 6);
    }

    #[tokio::test]
    async fn test_run_persists_snapshot() {
        let (catalog, similarity) = fixture();
        let mut source = MockPosterSource::new();
        source
            .expect_fetch_poster_path()
            .returning(|id| Ok(Some(format!("/{}.jpg", id))));
        let builder = builder(source, CacheBuildOptions::default());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poster_cache.json");
        let (cache, _report) = builder
            .run(&seeds(&["B"]), &catalog, &similarity, PosterCache::new(), &path)
            .await
            .unwrap();

        let loaded = PosterCache::load_snapshot(&path).await.unwrap();
        assert_eq!(loaded, Some(cache));
    }

    /// Tracks the peak number of concurrent lookups
    struct SlowSource {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl PosterSource for SlowSource {
        async fn fetch_poster_path(&self, _id: ItemId) -> AppResult<Option<String>> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(Some("/p.jpg".to_string()))
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_build_respects_concurrency_limit() {
        let (catalog, similarity) = fixture();
        let source = Arc::new(SlowSource {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let options = CacheBuildOptions {
            concurrency: 3,
            refresh_existing: false,
        };
        let builder = CacheBuilder::new(source.clone(), IMAGE_BASE, options);

        let (cache, _report) = builder
            .build(&seeds(&["A", "B"]), &catalog, &similarity, PosterCache::new())
            .await;

        assert_eq!(cache.len(), 11);
        assert!(source.peak.load(Ordering::SeqCst) <= 3);
    }
}
