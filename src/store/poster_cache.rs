use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::ItemId,
};

/// How posters are resolved for this process, decided once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServingMode {
    /// No snapshot found: every resolution goes to the remote source
    Live,
    /// Snapshot loaded: cache first, remote source on a miss
    Hybrid,
}

impl Display for ServingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServingMode::Live => write!(f, "live"),
            ServingMode::Hybrid => write!(f, "hybrid"),
        }
    }
}

/// Mapping from item id to a resolved poster URL
///
/// Only the offline cache build inserts entries. While serving the cache sits
/// behind an `Arc` and is read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PosterCache {
    entries: HashMap<ItemId, String>,
}

impl PosterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ItemId) -> Option<&str> {
        self.entries.get(&id).map(String::as_str)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn insert(&mut self, id: ItemId, url: String) -> Option<String> {
        self.entries.insert(id, url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.entries.keys().copied()
    }

    /// Loads a snapshot written by [`PosterCache::save_snapshot`]
    ///
    /// Returns `Ok(None)` when no snapshot exists. A snapshot that exists but
    /// cannot be read or parsed is an error. Blank URLs are dropped.
    pub async fn load_snapshot(path: impl AsRef<Path>) -> AppResult<Option<Self>> {
        let path = path.as_ref();
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::artifact(path, e)),
        };

        let mut entries: HashMap<ItemId, String> =
            serde_json::from_slice(&bytes).map_err(|e| AppError::artifact(path, e))?;

        let before = entries.len();
        entries.retain(|_, url| !url.trim().is_empty());
        if entries.len() < before {
            tracing::warn!(
                path = %path.display(),
                dropped = before - entries.len(),
                "Dropped blank poster URLs from snapshot"
            );
        }

        tracing::info!(path = %path.display(), entries = entries.len(), "Loaded poster cache snapshot");

        Ok(Some(Self { entries }))
    }

    /// Persists the cache as a JSON object keyed by id, sorted for stable diffs
    ///
    /// Writes to a sibling temporary file first and renames it over the target.
    pub async fn save_snapshot(&self, path: impl AsRef<Path>) -> AppResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let sorted: BTreeMap<&ItemId, &String> = self.entries.iter().collect();
        let json = serde_json::to_vec_pretty(&sorted)?;

        let tmp = temp_path(path);
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;

        tracing::info!(path = %path.display(), entries = self.len(), "Saved poster cache snapshot");

        Ok(())
    }
}

impl FromIterator<(ItemId, String)> for PosterCache {
    fn from_iter<T: IntoIterator<Item = (ItemId, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
