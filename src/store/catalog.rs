use std::collections::HashMap;
use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    models::Item,
};

/// Immutable table of recommendable items, indexed by row and by title
///
/// Row order matches the similarity matrix. Titles are not guaranteed unique in
/// the source data; the title index keeps the first row that carries a title, so
/// later duplicates can only be reached by row.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<Item>,
    title_index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds the catalog and its title index from rows in artifact order
    pub fn from_items(items: Vec<Item>) -> Self {
        let mut title_index = HashMap::with_capacity(items.len());
        let mut shadowed = 0usize;

        for (row, item) in items.iter().enumerate() {
            if title_index.contains_key(&item.title) {
                shadowed += 1;
                tracing::debug!(title = %item.title, row, "Duplicate title shadowed by earlier row");
                continue;
            }
            title_index.insert(item.title.clone(), row);
        }

        if shadowed > 0 {
            tracing::warn!(
                duplicates = shadowed,
                "Catalog contains duplicate titles; lookups resolve to the first occurrence"
            );
        }

        Self { items, title_index }
    }

    /// Loads the catalog artifact (a JSON array of movie records)
    pub async fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::artifact(path, e))?;
        let items: Vec<Item> =
            serde_json::from_slice(&bytes).map_err(|e| AppError::artifact(path, e))?;

        if items.is_empty() {
            return Err(AppError::artifact(path, "catalog contains no items"));
        }

        let catalog = Self::from_items(items);
        tracing::info!(path = %path.display(), items = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Row of the first item whose title matches exactly (case-sensitive)
    pub fn index_of(&self, title: &str) -> Option<usize> {
        self.title_index.get(title).copied()
    }

    pub fn get(&self, row: usize) -> Option<&Item> {
        self.items.get(row)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Titles in catalog order, duplicates included
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.title.as_str())
    }
}
