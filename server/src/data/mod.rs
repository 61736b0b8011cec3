//! Data storage layer
//!
//! - `raw` - typed readers for the generated source files
//! - `loaders` - per-entity loaders writing raw rows into warehouse tables
//! - `migrations` / `schema` - warehouse DDL and version bookkeeping
//! - `error` - unified error type

pub mod error;
pub mod loaders;
mod migrations;
pub mod raw;
pub mod schema;

pub use error::DataError;
pub use sqlx::PgPool;

use std::time::Duration;

use sqlx::ConnectOptions;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::log::LevelFilter;

use crate::core::config::DatabaseConfig;
use crate::core::constants::{DB_ACQUIRE_TIMEOUT_SECS, DB_MAX_CONNECTIONS};

/// Warehouse database service
///
/// Owns the connection pool. Created once at process start from the resolved
/// [`DatabaseConfig`] and shared by loaders, validator, and the reporting API.
pub struct Warehouse {
    pool: PgPool,
}

impl Warehouse {
    /// Connect to the warehouse and run pending migrations.
    ///
    /// Any connectivity failure is fatal; there is no retry.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DataError> {
        let mut options: PgConnectOptions = config
            .url
            .parse()
            .map_err(|e| DataError::Config(format!("Invalid database URL: {}", e)))?;

        options = options.log_statements(LevelFilter::Trace);

        let pool = PgPoolOptions::new()
            .max_connections(DB_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(DB_ACQUIRE_TIMEOUT_SECS))
            .connect_with(options)
            .await?;

        migrations::run_migrations(&pool).await?;

        tracing::debug!(max_connections = DB_MAX_CONNECTIONS, "Warehouse connected");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("Warehouse connection closed");
    }
}
