// ABOUTME: Data layer and persistence for todoinfo
// ABOUTME: SQLite pool setup, todo record storage and storage error types

use std::time::Duration;

use thiserror::Error;

pub mod db;
pub mod todos;

pub use db::{connect, PoolConfig};
pub use todos::{TodoStorage, QUERY_TIMEOUT, TODO_SORT_SAFELIST};

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("record not found")]
    NotFound,
    #[error("unable to update the record due to an edit conflict, please try again")]
    EditConflict,
    #[error("query did not finish within {0:?}")]
    Timeout(Duration),
}

pub type StorageResult<T> = Result<T, StorageError>;
