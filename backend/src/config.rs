//! Configuration management for the Dripmate sync server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with DRIPMATE_ prefix

use config::{builder::DefaultState, ConfigBuilder, ConfigError, Environment, File};
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

    /// Sync limits
    pub sync: SyncConfig,

    /// Cross-origin settings for the browser app
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    pub secret: String,

    /// Access token expiration in seconds
    pub access_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SyncConfig {
    /// Devices a single account may bind
    pub max_devices_per_user: i64,

    /// Coffees accepted in one uploaded list
    pub max_coffees: usize,

    /// Request body limit for uploads
    pub body_limit_bytes: usize,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorsConfig {
    /// Origin allowed to call the API; any origin when unset
    pub allowed_origin: Option<String>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("DRIPMATE_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Self::builder(&environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (DRIPMATE_ prefix)
            .add_source(
                Environment::with_prefix("DRIPMATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Builder seeded with the default values
    pub fn builder(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("environment", environment)?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("jwt.access_token_expiry", 2_592_000)?
            .set_default("sync.max_devices_per_user", 3)?
            .set_default("sync.max_coffees", 500)?
            .set_default("sync.body_limit_bytes", 5 * 1024 * 1024)
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_with(overrides: &[(&str, &str)]) -> Config {
        let mut builder = Config::builder("test").unwrap();
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value).unwrap();
        }
        builder.build().unwrap().try_deserialize().unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = load_with(&[
            ("database.url", "postgres://localhost/dripmate"),
            ("jwt.secret", "secret"),
        ]);
        assert_eq!(config.environment, "test");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.sync.max_devices_per_user, 3);
        assert_eq!(config.sync.max_coffees, 500);
        assert_eq!(config.sync.body_limit_bytes, 5 * 1024 * 1024);
        assert!(config.cors.allowed_origin.is_none());
        assert!(!config.is_development());
    }

    #[test]
    fn test_secret_is_required() {
        let result = Config::builder("test")
            .unwrap()
            .set_override("database.url", "postgres://localhost/dripmate")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize::<Config>();
        assert!(result.is_err());
    }
}
