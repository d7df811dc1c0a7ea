//! In-memory collaborators shared by the integration tests

#![allow(dead_code)]

use axum::async_trait;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use uuid::Uuid;

use terrain_risk_backend::{
    config::{Config, DatabaseConfig, JwtConfig, RefreshConfig, ServerConfig, WeatherConfig},
    error::{AppError, AppResult},
    external::ForecastProvider,
    models::{ForecastSeries, HourlySample, Terrain, TerrainIndicators},
    services::RefreshStatus,
    store::TerrainStore,
    AppState,
};

pub const JWT_SECRET: &str = "integration-secret";

/// Terrain store backed by a vector, counting writes
#[derive(Default)]
pub struct InMemoryTerrainStore {
    terrains: Mutex<Vec<Terrain>>,
    writes: AtomicUsize,
    fail_listing: bool,
}

impl InMemoryTerrainStore {
    pub fn with(terrains: Vec<Terrain>) -> Self {
        Self {
            terrains: Mutex::new(terrains),
            ..Default::default()
        }
    }

    /// A store whose listing always fails
    pub fn unavailable() -> Self {
        Self {
            fail_listing: true,
            ..Default::default()
        }
    }

    pub fn indicators_of(&self, terrain_id: i64) -> Option<TerrainIndicators> {
        self.terrains
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.terrain_id == terrain_id)
            .and_then(|t| t.indicators.clone())
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TerrainStore for InMemoryTerrainStore {
    async fn list_all(&self) -> AppResult<Vec<Terrain>> {
        if self.fail_listing {
            return Err(AppError::Internal("store unavailable".to_string()));
        }
        Ok(self.terrains.lock().unwrap().clone())
    }

    async fn find_by_terrain_id(&self, terrain_id: i64) -> AppResult<Option<Terrain>> {
        Ok(self
            .terrains
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.terrain_id == terrain_id)
            .cloned())
    }

    async fn set_indicators(&self, id: Uuid, indicators: &TerrainIndicators) -> AppResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if let Some(terrain) = self.terrains.lock().unwrap().iter_mut().find(|t| t.id == id) {
            terrain.indicators = Some(indicators.clone());
        }
        Ok(())
    }

    async fn ping(&self) -> bool {
        !self.fail_listing
    }
}

/// Forecast provider returning a fixed series, failing for chosen latitudes
pub struct FakeForecastProvider {
    series: ForecastSeries,
    failing_latitudes: Vec<f64>,
    calls: AtomicUsize,
}

impl FakeForecastProvider {
    pub fn new(series: ForecastSeries) -> Self {
        Self {
            series,
            failing_latitudes: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_at(mut self, latitude: f64) -> Self {
        self.failing_latitudes.push(latitude);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ForecastProvider for FakeForecastProvider {
    async fn fetch_forecast(&self, latitude: f64, _longitude: f64) -> AppResult<ForecastSeries> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_latitudes.contains(&latitude) {
            return Err(AppError::WeatherProvider("503 Service Unavailable".to_string()));
        }
        Ok(self.series.clone())
    }
}

pub fn terrain(terrain_id: i64, client_id: Option<i64>, coordinates: Option<(f64, f64)>) -> Terrain {
    Terrain {
        id: Uuid::new_v4(),
        terrain_id,
        client_id,
        latitude: coordinates.map(|c| c.0),
        longitude: coordinates.map(|c| c.1),
        surface: Some(3.5),
        description: Some("Parcelle nord".to_string()),
        culture: Some("blé dur".to_string()),
        indicators: None,
    }
}

/// `n` samples favourable to every rust disease and septoria
pub fn humid_series(n: usize) -> ForecastSeries {
    (0..n)
        .map(|i| HourlySample::new(format!("2024-05-01 {:02}:00:00", i % 24), 17.0, 92.0, 0.4))
        .collect()
}

pub fn test_config() -> Config {
    Config {
        environment: "test".to_string(),
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
            cors_origins: vec!["http://localhost:3000".to_string()],
        },
        database: DatabaseConfig {
            url: "postgres://localhost:5432".to_string(),
            name: "terrains_test".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
        },
        weather: WeatherConfig {
            api_endpoint: "http://127.0.0.1:9".to_string(),
            api_key: "test-key".to_string(),
        },
        refresh: RefreshConfig {
            interval_secs: 3600,
            max_restarts: 1,
            restart_backoff_secs: 0,
        },
    }
}

pub fn app_state(store: Arc<InMemoryTerrainStore>) -> AppState {
    AppState {
        store,
        config: Arc::new(test_config()),
        refresh: RefreshStatus::default(),
    }
}
