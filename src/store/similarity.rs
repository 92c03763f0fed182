use std::path::Path;

use super::Catalog;
use crate::error::{AppError, AppResult};

/// Immutable N×N matrix of pairwise similarity scores, stored row-major
///
/// Row `i`, column `j` is the similarity of catalog rows `i` and `j`. Only row
/// access is used, so symmetry is not required.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    dimension: usize,
    scores: Vec<f32>,
}

impl SimilarityIndex {
    /// Builds the index from rows, rejecting a matrix that is not square
    pub fn from_rows(rows: Vec<Vec<f32>>) -> AppResult<Self> {
        let dimension = rows.len();
        let mut scores = Vec::with_capacity(dimension * dimension);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != dimension {
                return Err(AppError::Internal(format!(
                    "similarity matrix is not square: row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    dimension
                )));
            }
            scores.extend(row);
        }

        Ok(Self { dimension, scores })
    }

    /// Loads the similarity artifact (a JSON array of rows)
    pub async fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::artifact(path, e))?;
        let rows: Vec<Vec<f32>> =
            serde_json::from_slice(&bytes).map_err(|e| AppError::artifact(path, e))?;

        let index = Self::from_rows(rows).map_err(|e| AppError::artifact(path, e))?;
        tracing::info!(path = %path.display(), dimension = index.len(), "Loaded similarity matrix");
        Ok(index)
    }

    pub fn row(&self, i: usize) -> Option<&[f32]> {
        if i >= self.dimension {
            return None;
        }
        let start = i * self.dimension;
        Some(&self.scores[start..start + self.dimension])
    }

    pub fn len(&self) -> usize {
        self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.dimension == 0
    }
}

/// Fails unless the matrix has exactly one row and column per catalog item
pub fn validate_alignment(catalog: &Catalog, similarity: &SimilarityIndex) -> AppResult<()> {
    if catalog.len() != similarity.len() {
        return Err(AppError::Internal(format!(
            "similarity matrix dimension {} does not match catalog size {}",
            similarity.len(),
            catalog.len()
        )));
    }
    Ok(())
}
