use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the item table (JSON array of movie records)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Path to the square similarity matrix, row-aligned with the catalog
    #[serde(default = "default_similarity_path")]
    pub similarity_path: String,

    /// Path to the poster cache snapshot; missing file means live mode
    #[serde(default = "default_poster_cache_path")]
    pub poster_cache_path: String,

    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL that relative poster paths are joined onto
    #[serde(default = "default_poster_image_base")]
    pub poster_image_base: String,

    /// Timeout for a live lookup while serving
    #[serde(default = "default_live_lookup_timeout_secs")]
    pub live_lookup_timeout_secs: u64,

    /// Timeout for a lookup during the offline cache build
    #[serde(default = "default_batch_lookup_timeout_secs")]
    pub batch_lookup_timeout_secs: u64,

    /// Maximum number of lookups in flight during the offline cache build
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,

    /// Seed titles for the offline cache build (comma-separated)
    #[serde(default = "default_cache_seeds")]
    pub cache_seeds: Vec<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_path() -> String {
    "artifacts/catalog.json".to_string()
}

fn default_similarity_path() -> String {
    "artifacts/similarity.json".to_string()
}

fn default_poster_cache_path() -> String {
    "artifacts/poster_cache.json".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_poster_image_base() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_live_lookup_timeout_secs() -> u64 {
    5
}

fn default_batch_lookup_timeout_secs() -> u64 {
    10
}

fn default_batch_concurrency() -> usize {
    8
}

fn default_cache_seeds() -> Vec<String> {
    [
        "Avatar",
        "The Dark Knight Rises",
        "Fight Club",
        "Inception",
        "Iron Man",
        "Spectre",
        "Dead Poets Society",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn live_lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.live_lookup_timeout_secs)
    }

    pub fn batch_lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.batch_lookup_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_only_api_key_is_set() {
        let vars = vec![("TMDB_API_KEY".to_string(), "secret".to_string())];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.tmdb_api_key, "secret");
        assert_eq!(config.catalog_path, "artifacts/catalog.json");
        assert_eq!(config.live_lookup_timeout(), Duration::from_secs(5));
        assert_eq!(config.batch_lookup_timeout(), Duration::from_secs(10));
        assert_eq!(config.cache_seeds.len(), 7);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_cache_seeds_parse_comma_separated() {
        let vars = vec![
            ("TMDB_API_KEY".to_string(), "secret".to_string()),
            ("CACHE_SEEDS".to_string(), "Avatar,Inception".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.cache_seeds, vec!["Avatar", "Inception"]);
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let vars: Vec<(String, String)> = vec![];
        assert!(envy::from_iter::<_, Config>(vars).is_err());
    }
}
