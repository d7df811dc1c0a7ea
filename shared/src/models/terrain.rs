//! Terrain (land plot) models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::weather::ForecastSeries;
use crate::risk::RiskScores;

/// Weather and risk bundle attached to a terrain, replaced wholesale on refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainIndicators {
    pub weather_forecast: ForecastSeries,
    pub risks: RiskScores,
    #[serde(rename = "lastUpdate")]
    pub last_update: String,
}

/// A registered land plot as returned to its owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Terrain {
    /// Storage identity, serialized as a plain string
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub terrain_id: i64,
    pub client_id: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub surface: Option<f64>,
    pub description: Option<String>,
    pub culture: Option<String>,
    pub indicators: Option<TerrainIndicators>,
}

impl Terrain {
    /// Owner id, 0 when the record carries none
    pub fn owner_id(&self) -> i64 {
        self.client_id.unwrap_or(0)
    }

    /// Coordinates usable for a forecast lookup.
    ///
    /// A missing or zero latitude/longitude disqualifies the plot.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0 => Some((lat, lon)),
            _ => None,
        }
    }
}
