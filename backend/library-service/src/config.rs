//! Configuration management for the library service
//!
//! Loads settings from:
//! 1. Environment variables
//! 2. .env file (local development)
//!
//! The settings feed the pool built by `db-pool` at process bootstrap;
//! the services only ever see the finished pool.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::info;

const SERVICE_NAME: &str = "library-service";

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
}

impl Settings {
    /// Load settings from environment variables (with .env fallback in
    /// development builds)
    pub fn load() -> Result<Self> {
        if cfg!(debug_assertions) {
            dotenvy::dotenv().ok();
            info!("Loaded .env file for development");
        }

        Ok(Settings {
            database: DatabaseSettings::from_env()?,
        })
    }
}

/// Database connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub path: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: u64,
    pub idle_timeout: u64,
    pub busy_timeout: u64,
}

impl DatabaseSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            path: env::var("DATABASE_PATH").context("DATABASE_PATH must be set")?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("Invalid DATABASE_MAX_CONNECTIONS")?,
            min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .context("Invalid DATABASE_MIN_CONNECTIONS")?,
            acquire_timeout: env::var("DATABASE_ACQUIRE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid DATABASE_ACQUIRE_TIMEOUT_SECS")?,
            idle_timeout: env::var("DATABASE_IDLE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "600".to_string())
                .parse()
                .context("Invalid DATABASE_IDLE_TIMEOUT_SECS")?,
            busy_timeout: env::var("DATABASE_BUSY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("Invalid DATABASE_BUSY_TIMEOUT_SECS")?,
        })
    }

    /// Translate into the pool configuration consumed by `db-pool`
    pub fn pool_config(&self) -> db_pool::DbConfig {
        db_pool::DbConfig {
            service_name: SERVICE_NAME.to_string(),
            database_path: self.path.clone().into(),
            create_if_missing: true,
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            acquire_timeout_secs: self.acquire_timeout,
            idle_timeout_secs: self.idle_timeout,
            busy_timeout_secs: self.busy_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn settings_require_database_path() {
        env::remove_var("DATABASE_PATH");
        assert!(Settings::load().is_err());
    }

    #[test]
    #[serial]
    fn settings_load_with_defaults() {
        env::set_var("DATABASE_PATH", "library.db");
        env::remove_var("DATABASE_MAX_CONNECTIONS");
        let settings = Settings::load().expect("settings should load");
        assert_eq!(settings.database.path, "library.db");
        assert_eq!(settings.database.max_connections, 5);
        let pool_config = settings.database.pool_config();
        assert_eq!(pool_config.service_name, SERVICE_NAME);
        env::remove_var("DATABASE_PATH");
    }

    #[test]
    #[serial]
    fn invalid_override_is_rejected() {
        env::set_var("DATABASE_PATH", "library.db");
        env::set_var("DATABASE_MAX_CONNECTIONS", "not-a-number");
        assert!(Settings::load().is_err());
        env::remove_var("DATABASE_PATH");
        env::remove_var("DATABASE_MAX_CONNECTIONS");
    }
}
