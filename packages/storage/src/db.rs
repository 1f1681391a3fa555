// ABOUTME: Database connection management
// ABOUTME: Builds the SQLite pool from DSN and sizing options

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::StorageResult;

/// How long opening the pool may take before startup fails
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Pool sizing and location.
///
/// Connections are opened on demand up to `max_open_conns`; an idle one is
/// closed after `max_idle_time`.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub dsn: String,
    pub max_open_conns: u32,
    pub max_idle_time: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            dsn: "sqlite://todoinfo.db?mode=rwc".to_string(),
            max_open_conns: 25,
            max_idle_time: Duration::from_secs(15 * 60),
        }
    }
}

impl PoolConfig {
    /// Each connection to `sqlite::memory:` opens its own empty database
    pub fn is_memory(&self) -> bool {
        self.dsn.contains(":memory:") || self.dsn.contains("mode=memory")
    }
}

/// Open the connection pool and make sure a connection can be acquired.
pub async fn connect(config: &PoolConfig) -> StorageResult<SqlitePool> {
    debug!("Connecting to database: {}", config.dsn);

    let options = SqliteConnectOptions::from_str(&config.dsn)?.create_if_missing(true);

    let pool_options = if config.is_memory() {
        // a single connection that never expires keeps the database alive
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
            .max_connections(config.max_open_conns)
            .idle_timeout(config.max_idle_time)
    };

    let pool = pool_options
        .acquire_timeout(CONNECT_TIMEOUT)
        .connect_with(options)
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    info!("Database connection pool established");

    Ok(pool)
}
