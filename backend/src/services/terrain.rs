//! Terrain lookup for authenticated owners

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::Terrain;
use crate::store::TerrainStore;

/// Read access to stored terrains
#[derive(Clone)]
pub struct TerrainService {
    store: Arc<dyn TerrainStore>,
}

impl TerrainService {
    /// Create a new TerrainService instance
    pub fn new(store: Arc<dyn TerrainStore>) -> Self {
        Self { store }
    }

    /// Get a terrain by its external id, provided the caller owns it
    pub async fn get_terrain(&self, terrain_id: i64, caller_id: i64) -> AppResult<Terrain> {
        let terrain = self
            .store
            .find_by_terrain_id(terrain_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Terrain".to_string()))?;

        if terrain.owner_id() != caller_id {
            return Err(AppError::Forbidden(format!(
                "terrain {} is not owned by client {}",
                terrain_id, caller_id
            )));
        }

        Ok(terrain)
    }
}
