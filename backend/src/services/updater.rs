//! Terrain updater: forecast fetch, risk scoring and indicator write-back

use chrono::{SecondsFormat, Utc};
use std::sync::Arc;

use crate::error::AppResult;
use crate::external::ForecastProvider;
use crate::models::{RiskScores, Terrain, TerrainIndicators};
use crate::store::TerrainStore;

/// Result of refreshing one terrain
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated(TerrainIndicators),
    /// The terrain has no usable coordinates; nothing was fetched or written
    Skipped,
}

/// Refreshes the indicators of single terrains
#[derive(Clone)]
pub struct TerrainUpdater {
    store: Arc<dyn TerrainStore>,
    provider: Arc<dyn ForecastProvider>,
}

impl TerrainUpdater {
    /// Create a new TerrainUpdater instance
    pub fn new(store: Arc<dyn TerrainStore>, provider: Arc<dyn ForecastProvider>) -> Self {
        Self { store, provider }
    }

    /// Fetch the forecast for a terrain, score it and overwrite its indicators
    pub async fn update_terrain(&self, terrain: &Terrain) -> AppResult<UpdateOutcome> {
        let Some((latitude, longitude)) = terrain.coordinates() else {
            tracing::debug!(
                terrain_id = terrain.terrain_id,
                "Skipping terrain without coordinates"
            );
            return Ok(UpdateOutcome::Skipped);
        };

        let weather_forecast = self.provider.fetch_forecast(latitude, longitude).await?;
        let risks = RiskScores::compute(&weather_forecast);

        let indicators = TerrainIndicators {
            weather_forecast,
            risks,
            last_update: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        };

        self.store.set_indicators(terrain.id, &indicators).await?;

        tracing::info!(
            terrain_id = terrain.terrain_id,
            ?risks,
            "Terrain {} updated",
            terrain.terrain_id
        );

        Ok(UpdateOutcome::Updated(indicators))
    }
}
