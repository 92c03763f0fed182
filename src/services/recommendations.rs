use std::sync::Arc;

use futures::future::join_all;

use crate::{
    error::{AppError, AppResult},
    models::Recommendation,
    services::{poster_resolver::PosterResolver, ranking},
    store::{Catalog, SimilarityIndex},
};

/// Recommends the movies most similar to a selected title
///
/// Ranking is pure and runs entirely against the in-memory catalog and
/// similarity matrix. Poster resolution is the only I/O and starts only after
/// ranking succeeded, so an unknown title never touches the network.
#[derive(Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    similarity: Arc<SimilarityIndex>,
    resolver: Arc<PosterResolver>,
}

impl Recommender {
    pub fn new(
        catalog: Arc<Catalog>,
        similarity: Arc<SimilarityIndex>,
        resolver: Arc<PosterResolver>,
    ) -> Self {
        Self {
            catalog,
            similarity,
            resolver,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn resolver(&self) -> &PosterResolver {
        &self.resolver
    }

    /// Catalog rows of the top neighbors of `title`, most similar first
    pub fn neighbors(&self, title: &str) -> AppResult<Vec<usize>> {
        ranking::neighbor_rows(&self.catalog, &self.similarity, title).map(|(_, rows)| rows)
    }

    /// Ranked neighbors of `title` with metadata and a resolved poster each
    pub async fn recommend(&self, title: &str) -> AppResult<Vec<Recommendation>> {
        let rows = self.neighbors(title)?;

        let items = rows
            .iter()
            .map(|&row| {
                self.catalog
                    .get(row)
                    .ok_or_else(|| AppError::Internal(format!("catalog has no row {}", row)))
            })
            .collect::<AppResult<Vec<_>>>()?;

        // One resolution per neighbor, joined back in rank order
        let posters = join_all(items.iter().map(|item| self.resolver.resolve(item.id))).await;

        let recommendations: Vec<Recommendation> = items
            .into_iter()
            .zip(posters)
            .map(|(item, poster)| Recommendation::new(item, poster))
            .collect();

        tracing::info!(
            title = %title,
            results = recommendations.len(),
            placeholders = recommendations
                .iter()
                .filter(|r| r.poster_tier.is_placeholder())
                .count(),
            "Recommendations computed"
        );

        Ok(recommendations)
    }
}
