//! TMDB movie details provider
//!
//! API Flow:
//! 1. Details: /movie/{id} → JSON document with an optional `poster_path`
//! 2. The caller joins `poster_path` onto the configured image base

use crate::{
    error::{AppError, AppResult},
    models::ItemId,
    services::posters::PosterSource,
};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;

const LANGUAGE: &str = "en-US";

/// The subset of the movie details document we read
#[derive(Debug, Deserialize)]
pub(crate) struct TmdbMovieDetails {
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl TmdbMovieDetails {
    /// Blank paths are treated as absent
    fn usable_poster_path(self) -> Option<String> {
        self.poster_path
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
    }
}

#[derive(Clone)]
pub struct TmdbPosterSource {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    timeout: Duration,
}

impl TmdbPosterSource {
    /// Creates a source whose every request is bounded by `timeout`
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            timeout,
        }
    }

    fn details_url(&self, id: ItemId) -> String {
        format!("{}/movie/{}", self.api_url.trim_end_matches('/'), id)
    }
}

#[async_trait::async_trait]
impl PosterSource for TmdbPosterSource {
    async fn fetch_poster_path(&self, id: ItemId) -> AppResult<Option<String>> {
        let url = self.details_url(id);

        tracing::debug!(
            item_id = %id,
            timeout_ms = self.timeout.as_millis() as u64,
            "Fetching movie details"
        );

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", LANGUAGE)])
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {} for movie {}: {}",
                status, id, body
            )));
        }

        let details: TmdbMovieDetails = response.json().await?;
        let poster_path = details.usable_poster_path();

        tracing::debug!(
            item_id = %id,
            has_poster = poster_path.is_some(),
            provider = "tmdb",
            "Movie details fetched"
        );

        Ok(poster_path)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
