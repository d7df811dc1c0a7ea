//! Weather API client for fetching forecasts
//!
//! Integrates with the OpenWeatherMap 5 day / 3 hour forecast API

use axum::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::{ForecastSeries, HourlySample, FORECAST_LENGTH};

/// Source of forecast series for a location
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Fetch the normalized forecast for a latitude/longitude
    async fn fetch_forecast(&self, latitude: f64, longitude: f64) -> AppResult<ForecastSeries>;
}

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// OpenWeatherMap API response for forecast
#[derive(Debug, Deserialize)]
pub struct OWMForecastResponse {
    pub list: Vec<OWMForecastItem>,
}

#[derive(Debug, Deserialize)]
pub struct OWMForecastItem {
    pub dt_txt: String,
    pub main: OWMMain,
    pub rain: Option<OWMForecastRain>,
}

#[derive(Debug, Deserialize)]
pub struct OWMMain {
    pub temp: f64,
    pub humidity: f64,
}

#[derive(Debug, Deserialize)]
pub struct OWMForecastRain {
    #[serde(rename = "3h")]
    pub three_hour: Option<f64>,
}

impl WeatherClient {
    /// Create a new WeatherClient against the given API base URL
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the raw forecast by GPS coordinates
    pub async fn get_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> AppResult<OWMForecastResponse> {
        let url = format!("{}/forecast", self.base_url);
        let lat = latitude.to_string();
        let lon = longitude.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| AppError::WeatherProvider(format!("Weather API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::WeatherProvider(format!(
                "Weather API error: {} - {}",
                status, body
            )));
        }

        response.json().await.map_err(|e| {
            AppError::WeatherProvider(format!("Failed to parse forecast response: {}", e))
        })
    }
}

#[async_trait]
impl ForecastProvider for WeatherClient {
    async fn fetch_forecast(&self, latitude: f64, longitude: f64) -> AppResult<ForecastSeries> {
        let data = self.get_forecast(latitude, longitude).await?;
        Ok(normalize_forecast(data))
    }
}

/// Convert the provider response into the first 48 normalized samples
pub fn normalize_forecast(data: OWMForecastResponse) -> ForecastSeries {
    data.list
        .into_iter()
        .take(FORECAST_LENGTH)
        .map(|item| {
            let precipitation = item.rain.and_then(|r| r.three_hour).unwrap_or(0.0);
            HourlySample::new(item.dt_txt, item.main.temp, item.main.humidity, precipitation)
        })
        .collect()
}
