//! Weather forecast models

use serde::{Deserialize, Serialize};

/// Number of provider entries kept per forecast (3-hour buckets, about 6 days)
pub const FORECAST_LENGTH: usize = 48;

/// Humidity (percent) at or above which a sample counts as wet
pub const WET_HUMIDITY_PERCENT: f64 = 90.0;

/// One normalized forecast sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySample {
    /// Provider-native timestamp, e.g. `2024-05-01 12:00:00`
    #[serde(rename = "time")]
    pub timestamp: String,
    #[serde(rename = "temp")]
    pub temperature: f64,
    pub humidity: f64,
    /// Precipitation in mm over the sample's own bucket
    pub precipitation: f64,
    is_wet: bool,
}

impl HourlySample {
    pub fn new(
        timestamp: impl Into<String>,
        temperature: f64,
        humidity: f64,
        precipitation: f64,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            temperature,
            humidity,
            precipitation,
            is_wet: humidity >= WET_HUMIDITY_PERCENT || precipitation > 0.0,
        }
    }

    /// True iff humidity >= 90% or any precipitation fell
    pub fn is_wet(&self) -> bool {
        self.is_wet
    }
}

/// Chronological forecast window attached to a terrain
pub type ForecastSeries = Vec<HourlySample>;
