use std::cmp::Ordering;

use crate::{
    error::{AppError, AppResult},
    models::ItemId,
    store::{Catalog, SimilarityIndex},
};

/// Number of neighbors returned for a selected movie
pub const RECOMMENDATION_COUNT: usize = 5;

/// Ranks the columns of a similarity row, most similar first
///
/// `self_index` is dropped by identity, not by position, so a row whose
/// diagonal is not its maximum still yields `k` real neighbors. Equal scores
/// keep ascending row order and NaN scores sort after every number.
pub fn top_neighbors(row: &[f32], self_index: usize, k: usize) -> Vec<usize> {
    let mut ranked: Vec<(usize, f32)> = row
        .iter()
        .copied()
        .enumerate()
        .filter(|(j, _)| *j != self_index)
        .collect();

    // sort_by is stable
    ranked.sort_by(|(_, a), (_, b)| descending(*a, *b));
    ranked.truncate(k);
    ranked.into_iter().map(|(j, _)| j).collect()
}

fn descending(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Resolves `title` and returns its row and the rows of its nearest neighbors
pub fn neighbor_rows(
    catalog: &Catalog,
    similarity: &SimilarityIndex,
    title: &str,
) -> AppResult<(usize, Vec<usize>)> {
    let row_index = catalog
        .index_of(title)
        .ok_or_else(|| AppError::NotFound(format!("Movie '{}' not found in catalog", title)))?;

    let row = similarity.row(row_index).ok_or_else(|| {
        AppError::Internal(format!(
            "catalog row {} has no similarity row (dimension {})",
            row_index,
            similarity.len()
        ))
    })?;

    Ok((
        row_index,
        top_neighbors(row, row_index, RECOMMENDATION_COUNT),
    ))
}

/// Ids of a seed movie followed by the ids of its ranked neighbors
pub fn seed_item_ids(
    catalog: &Catalog,
    similarity: &SimilarityIndex,
    title: &str,
) -> AppResult<Vec<ItemId>> {
    let (seed_row, neighbors) = neighbor_rows(catalog, similarity, title)?;

    std::iter::once(seed_row)
        .chain(neighbors)
        .map(|row| {
            catalog
                .get(row)
                .map(|item| item.id)
                .ok_or_else(|| AppError::Internal(format!("catalog has no row {}", row)))
        })
        .collect()
}
