//! Database pool setup and migration runner.

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::{info, log};

use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::migrator::Migrator;

pub type DbPool = DatabaseConnection;

/// Connection pool settings, separated from the rest of the app config so
/// tests can construct pools directly.
#[derive(Clone, Debug)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub acquire_timeout: Duration,
}

impl DbConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 16,
            min_connections: 2,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            acquire_timeout: Duration::from_secs(8),
        }
    }
}

impl From<&AppConfig> for DbConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            url: cfg.database_url.clone(),
            max_connections: cfg.db_max_connections,
            min_connections: cfg.db_min_connections,
            connect_timeout: Duration::from_secs(cfg.db_connect_timeout_secs),
            idle_timeout: Duration::from_secs(cfg.db_idle_timeout_secs),
            acquire_timeout: Duration::from_secs(cfg.db_acquire_timeout_secs),
        }
    }
}

/// Opens a connection pool with the given settings.
pub async fn establish_connection_with_config(config: DbConfig) -> Result<DbPool, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .idle_timeout(config.idle_timeout)
        .acquire_timeout(config.acquire_timeout)
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let pool = Database::connect(options).await?;
    info!("database connection established");
    Ok(pool)
}

/// Opens a pool from the application configuration.
pub async fn establish_connection_from_app_config(cfg: &AppConfig) -> Result<DbPool, DbErr> {
    establish_connection_with_config(DbConfig::from(cfg)).await
}

/// Applies all pending migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), ServiceError> {
    info!("running database migrations");
    Migrator::up(pool, None)
        .await
        .map_err(|e| ServiceError::MigrationError(e.to_string()))?;
    info!("database migrations complete");
    Ok(())
}

/// Cheap liveness probe used by the health endpoint.
pub async fn check_connection(pool: &DbPool) -> Result<(), DbErr> {
    pool.ping().await
}

pub async fn close_pool(pool: DbPool) -> Result<(), DbErr> {
    pool.close().await
}
