//! Configuration management for the terrain risk service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with TERRAIN_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// Weather API configuration
    pub weather: WeatherConfig,

    /// Background refresh configuration
    pub refresh: RefreshConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,

    /// Origins allowed by the CORS layer
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Database name, overrides the one in the URL
    pub name: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Shared HS256 secret used to verify bearer tokens
    pub secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key
    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshConfig {
    /// Pause between two periodic refresh passes
    pub interval_secs: u64,

    /// Consecutive failed passes tolerated before the periodic task gives up
    pub max_restarts: u32,

    /// Wait before retrying after a failed pass
    pub restart_backoff_secs: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("TERRAIN_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = Self::builder(&environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (TERRAIN_ prefix)
            .add_source(
                Environment::with_prefix("TERRAIN")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins"),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn builder(
        environment: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("environment", environment)?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default(
                "server.cors_origins",
                vec!["http://localhost:3000", "http://192.168.56.1:3000"],
            )?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("weather.api_endpoint", "https://api.openweathermap.org/data/2.5")?
            .set_default("refresh.interval_secs", 3600)?
            .set_default("refresh.max_restarts", 5)?
            .set_default("refresh.restart_backoff_secs", 30)
    }

    /// Reject blank values for settings the service cannot run without
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("database.url", &self.database.url),
            ("database.name", &self.database.name),
            ("weather.api_key", &self.weather.api_key),
            ("jwt.secret", &self.jwt.secret),
        ];

        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((key, _)) => Err(ConfigError::Message(format!("{} must not be empty", key))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_with(overrides: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let mut builder = Config::builder("test")?;
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }
        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    const COMPLETE: [(&str, &str); 4] = [
        ("database.url", "postgres://localhost:5432"),
        ("database.name", "terrains"),
        ("weather.api_key", "owm-key"),
        ("jwt.secret", "secret"),
    ];

    #[test]
    fn test_defaults_applied() {
        let config = load_with(&COMPLETE).unwrap();

        assert_eq!(config.environment, "test");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.refresh.interval_secs, 3600);
        assert_eq!(config.server.cors_origins.len(), 2);
        assert_eq!(
            config.weather.api_endpoint,
            "https://api.openweathermap.org/data/2.5"
        );
    }

    #[test]
    fn test_missing_secret_rejected() {
        let overrides: Vec<_> = COMPLETE
            .iter()
            .copied()
            .filter(|(key, _)| *key != "jwt.secret")
            .collect();

        assert!(load_with(&overrides).is_err());
    }

    #[test]
    fn test_blank_api_key_rejected() {
        let mut overrides = COMPLETE.to_vec();
        overrides.push(("weather.api_key", "  "));

        let err = load_with(&overrides).unwrap_err();
        assert!(err.to_string().contains("weather.api_key"));
    }
}
