//! PostgreSQL-backed terrain store

use axum::async_trait;
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use super::TerrainStore;
use crate::error::AppResult;
use crate::models::{Terrain, TerrainIndicators};

const TERRAIN_COLUMNS: &str = "id, terrain_id, client_id, latitude, longitude, surface, \
                               description, culture, indicators";

/// Terrain store over the `terrainmongos` table
#[derive(Clone)]
pub struct PgTerrainStore {
    db: PgPool,
}

/// Raw terrain row
#[derive(Debug, FromRow)]
struct TerrainRow {
    id: Uuid,
    terrain_id: i64,
    client_id: Option<i64>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    surface: Option<f64>,
    description: Option<String>,
    culture: Option<String>,
    indicators: Option<serde_json::Value>,
}

impl From<TerrainRow> for Terrain {
    fn from(row: TerrainRow) -> Self {
        // Rows written before the first refresh may carry an empty object here.
        let indicators = row.indicators.and_then(|value| {
            serde_json::from_value::<TerrainIndicators>(value)
                .map_err(|e| {
                    tracing::warn!(
                        terrain_id = row.terrain_id,
                        "Ignoring unreadable indicators: {}",
                        e
                    )
                })
                .ok()
        });

        Terrain {
            id: row.id,
            terrain_id: row.terrain_id,
            client_id: row.client_id,
            latitude: row.latitude,
            longitude: row.longitude,
            surface: row.surface,
            description: row.description,
            culture: row.culture,
            indicators,
        }
    }
}

impl PgTerrainStore {
    /// Create a new PgTerrainStore instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TerrainStore for PgTerrainStore {
    async fn list_all(&self) -> AppResult<Vec<Terrain>> {
        let rows = sqlx::query_as::<_, TerrainRow>(&format!(
            "SELECT {} FROM terrainmongos",
            TERRAIN_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Terrain::from).collect())
    }

    async fn find_by_terrain_id(&self, terrain_id: i64) -> AppResult<Option<Terrain>> {
        let row = sqlx::query_as::<_, TerrainRow>(&format!(
            "SELECT {} FROM terrainmongos WHERE terrain_id = $1",
            TERRAIN_COLUMNS
        ))
        .bind(terrain_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Terrain::from))
    }

    async fn set_indicators(&self, id: Uuid, indicators: &TerrainIndicators) -> AppResult<()> {
        sqlx::query("UPDATE terrainmongos SET indicators = $2 WHERE id = $1")
            .bind(id)
            .bind(Json(indicators))
            .execute(&self.db)
            .await?;

        Ok(())
    }

    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.db).await.is_ok()
    }
}
