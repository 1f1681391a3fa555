// ABOUTME: Server configuration parsed from command-line flags and environment
// ABOUTME: Defines the flags, their env var fallbacks and validation

use std::fmt;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use thiserror::Error;

use todoinfo_config::{
    TODOINFO_ENV, TODOINFO_PORT, TODO_DB_DSN, TODO_DB_MAX_IDLE_TIME, TODO_DB_MAX_OPEN_CONNS,
};
use todoinfo_storage::PoolConfig;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid duration '{0}' (expected e.g. 30s, 15m or 1h)")]
    InvalidDuration(String),
    #[error("Database pool needs at least one open connection")]
    EmptyPool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "todoinfo")]
#[command(about = "JSON API for managing todo records")]
#[command(version)]
pub struct Config {
    /// API server port
    #[arg(long, env = TODOINFO_PORT, default_value_t = 4000)]
    pub port: u16,

    /// Environment reported by the healthcheck
    #[arg(long = "env", env = TODOINFO_ENV, value_enum, default_value_t = Environment::Development)]
    pub environment: Environment,

    /// SQLite DSN
    #[arg(long, env = TODO_DB_DSN, default_value = "sqlite://todoinfo.db?mode=rwc")]
    pub db_dsn: String,

    /// Maximum open database connections
    #[arg(long, env = TODO_DB_MAX_OPEN_CONNS, default_value_t = 25)]
    pub db_max_open_conns: u32,

    /// How long an idle connection is kept
    #[arg(long, env = TODO_DB_MAX_IDLE_TIME, default_value = "15m", value_parser = parse_duration)]
    pub db_max_idle_time: Duration,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::PortOutOfRange(self.port));
        }
        if self.db_max_open_conns == 0 {
            return Err(ConfigError::EmptyPool);
        }
        Ok(())
    }

    pub fn to_pool_config(&self) -> PoolConfig {
        PoolConfig {
            dsn: self.db_dsn.clone(),
            max_open_conns: self.db_max_open_conns,
            max_idle_time: self.db_max_idle_time,
        }
    }
}

/// Parse `<n>s`, `<n>m` or `<n>h`
pub fn parse_duration(raw: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration(raw.to_string());
    let value = raw.trim();

    let (amount, multiplier) = if let Some(amount) = value.strip_suffix('s') {
        (amount, 1)
    } else if let Some(amount) = value.strip_suffix('m') {
        (amount, 60)
    } else if let Some(amount) = value.strip_suffix('h') {
        (amount, 60 * 60)
    } else {
        return Err(invalid());
    };

    let amount: u64 = amount.parse().map_err(|_| invalid())?;
    amount
        .checked_mul(multiplier)
        .map(Duration::from_secs)
        .ok_or_else(invalid)
}
