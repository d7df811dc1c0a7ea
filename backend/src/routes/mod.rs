//! Route definitions for the terrain risk service

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        // Bearer token required
        .route("/terrainmongos/:terrain_id", get(handlers::get_terrain))
}
