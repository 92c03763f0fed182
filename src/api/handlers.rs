use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::RecommendationResponse,
    store::ServingMode,
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub mode: ServingMode,
    pub cached_posters: usize,
}

/// Health check endpoint, also reporting the poster serving mode
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        mode: state.mode(),
        cached_posters: state.recommender.resolver().cached_posters(),
    })
}

/// All catalog titles in catalog order, for a selection widget
pub async fn list_titles(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.catalog().titles().map(str::to_string).collect())
}

/// Top neighbors of the selected title with posters resolved
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        title = %query.title,
        "Processing recommendation request"
    );

    let recommendations = state.recommender.recommend(&query.title).await?;

    Ok(Json(RecommendationResponse {
        title: query.title,
        recommendations,
    }))
}
