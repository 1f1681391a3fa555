// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across todoinfo

// Server Configuration
pub const TODOINFO_PORT: &str = "TODOINFO_PORT";
pub const TODOINFO_ENV: &str = "TODOINFO_ENV";

// Database Configuration
pub const TODO_DB_DSN: &str = "TODO_DB_DSN";
pub const TODO_DB_MAX_OPEN_CONNS: &str = "TODO_DB_MAX_OPEN_CONNS";
pub const TODO_DB_MAX_IDLE_TIME: &str = "TODO_DB_MAX_IDLE_TIME";

// Logging
pub const RUST_LOG: &str = "RUST_LOG";
