use std::sync::Arc;

use crate::{
    services::{PosterResolver, Recommender},
    store::{Catalog, ServingMode, SimilarityIndex},
};

/// Shared application state
///
/// Everything here is loaded once at startup and read-only afterwards, so
/// requests share it through `Arc` without locking.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
}

impl AppState {
    pub fn new(
        catalog: Arc<Catalog>,
        similarity: Arc<SimilarityIndex>,
        resolver: Arc<PosterResolver>,
    ) -> Self {
        Self {
            recommender: Recommender::new(catalog, similarity, resolver),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.recommender.catalog()
    }

    pub fn mode(&self) -> ServingMode {
        self.recommender.resolver().mode()
    }
}
