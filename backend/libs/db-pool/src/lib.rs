//! Database connection pool management
//!
//! Provides unified pool creation and configuration for the library backend.
//! The pool is built once at process bootstrap and handed to the service
//! layer; nothing in this crate holds global state.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info};

/// Database connection pool configuration
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Service name for log labeling
    pub service_name: String,
    /// Path to the SQLite database file (":memory:" for an in-memory store)
    pub database_path: PathBuf,
    /// Create the database file if it does not exist
    pub create_if_missing: bool,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Minimum number of connections
    pub min_connections: u32,
    /// Connection acquisition timeout (get connection from pool)
    pub acquire_timeout_secs: u64,
    /// Connection idle timeout
    pub idle_timeout_secs: u64,
    /// How long a statement waits on a locked database before failing
    pub busy_timeout_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            service_name: String::from("unknown"),
            database_path: PathBuf::from("library.db"),
            create_if_missing: true,
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_secs: 10,
            idle_timeout_secs: 600,
            busy_timeout_secs: 5,
        }
    }
}

impl DbConfig {
    /// Create a new DbConfig from environment variables
    pub fn from_env(service_name: &str) -> Result<Self, String> {
        let database_path = std::env::var("DATABASE_PATH")
            .map_err(|_| "DATABASE_PATH environment variable not set".to_string())?;

        Ok(Self {
            service_name: service_name.to_string(),
            database_path: PathBuf::from(database_path),
            create_if_missing: std::env::var("DB_CREATE_IF_MISSING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            min_connections: std::env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            acquire_timeout_secs: std::env::var("DB_ACQUIRE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            idle_timeout_secs: std::env::var("DB_IDLE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600),
            busy_timeout_secs: std::env::var("DB_BUSY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        })
    }

    /// Log pool configuration details
    pub fn log_config(&self) {
        info!(
            "Database Pool Configuration: \
             path={}, max_connections={}, min_connections={}, \
             acquire_timeout={}s, idle_timeout={}s, busy_timeout={}s",
            self.database_path.display(),
            self.max_connections,
            self.min_connections,
            self.acquire_timeout_secs,
            self.idle_timeout_secs,
            self.busy_timeout_secs
        );
    }
}

/// Create a SQLite connection pool and verify it with a probe query
pub async fn create_pool(config: DbConfig) -> Result<SqlitePool, sqlx::Error> {
    debug!(
        "Creating database pool: service={}, path={}, max={}, min={}, acquire_timeout={}s",
        config.service_name,
        config.database_path.display(),
        config.max_connections,
        config.min_connections,
        config.acquire_timeout_secs
    );

    let options = SqliteConnectOptions::new()
        .filename(&config.database_path)
        .create_if_missing(config.create_if_missing)
        // Referential checks in the schema are load-bearing; SQLite leaves
        // foreign key enforcement off unless asked per connection.
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(config.busy_timeout_secs));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        // Timeout for acquiring a connection from the pool
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        // Close connections idle for longer than this
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect_with(options)
        .await?;

    match sqlx::query("SELECT 1").execute(&pool).await {
        Ok(_) => {
            info!(
                service = %config.service_name,
                "Database pool created and verified successfully"
            );
            Ok(pool)
        }
        Err(e) => {
            error!(
                service = %config.service_name,
                error = %e,
                "Database connection verification failed"
            );
            Err(e)
        }
    }
}

/// Check pool health by executing a probe query
pub async fn health_check(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn memory_config() -> DbConfig {
        DbConfig {
            service_name: "db-pool-test".to_string(),
            database_path: PathBuf::from(":memory:"),
            // A second in-memory connection would see a different database,
            // so the tests pin the pool to a single connection.
            max_connections: 1,
            min_connections: 1,
            ..DbConfig::default()
        }
    }

    #[tokio::test]
    async fn create_pool_and_health_check() {
        let pool = create_pool(memory_config())
            .await
            .expect("pool creation should succeed");
        health_check(&pool).await.expect("health check should pass");
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let pool = create_pool(memory_config())
            .await
            .expect("pool creation should succeed");
        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .expect("pragma query should succeed");
        assert_eq!(enabled, 1);
    }

    #[test]
    #[serial]
    fn from_env_requires_database_path() {
        std::env::remove_var("DATABASE_PATH");
        assert!(DbConfig::from_env("db-pool-test").is_err());
    }

    #[test]
    #[serial]
    fn from_env_reads_overrides() {
        std::env::set_var("DATABASE_PATH", ":memory:");
        std::env::set_var("DB_MAX_CONNECTIONS", "3");
        let config = DbConfig::from_env("db-pool-test").expect("config should load");
        assert_eq!(config.database_path, PathBuf::from(":memory:"));
        assert_eq!(config.max_connections, 3);
        assert_eq!(config.min_connections, 1);
        std::env::remove_var("DATABASE_PATH");
        std::env::remove_var("DB_MAX_CONNECTIONS");
    }
}
