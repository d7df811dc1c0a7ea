//! Terrain HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::middleware::CurrentUser;
use crate::services::TerrainService;
use crate::AppState;

/// Get a terrain with its indicators, for its owner only
pub async fn get_terrain(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(terrain_id): Path<i64>,
) -> impl IntoResponse {
    let service = TerrainService::new(state.store.clone());

    match service.get_terrain(terrain_id, current_user.0.id).await {
        Ok(terrain) => (StatusCode::OK, Json(terrain)).into_response(),
        Err(e) => e.into_response(),
    }
}
