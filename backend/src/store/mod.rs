//! Terrain storage
//!
//! `TerrainStore` is the seam between the services and the document table
//! holding terrain records. Services receive it as an `Arc<dyn TerrainStore>`.

use axum::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Terrain, TerrainIndicators};

mod postgres;

pub use postgres::PgTerrainStore;

#[async_trait]
pub trait TerrainStore: Send + Sync {
    /// Every stored terrain, in no particular order
    async fn list_all(&self) -> AppResult<Vec<Terrain>>;

    /// Look a terrain up by its external identifier
    async fn find_by_terrain_id(&self, terrain_id: i64) -> AppResult<Option<Terrain>>;

    /// Replace the indicators of the terrain with the given storage id
    async fn set_indicators(&self, id: Uuid, indicators: &TerrainIndicators) -> AppResult<()>;

    /// Whether the store is reachable
    async fn ping(&self) -> bool;
}
