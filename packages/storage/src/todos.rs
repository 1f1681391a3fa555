// ABOUTME: Todo storage layer using SQLite
// ABOUTME: CRUD with optimistic concurrency plus filtered, sorted, paginated listing

use std::future::Future;
use std::time::Duration;

use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tokio::time::timeout;
use tracing::debug;

use todoinfo_core::{Filters, Metadata, Todo};

use crate::{StorageError, StorageResult};

/// Deadline applied to every storage operation
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Sort tokens accepted by [`TodoStorage::list`]
pub const TODO_SORT_SAFELIST: &[&str] = &["id", "name", "task", "-id", "-name", "-task"];

/// Columns of the `todo` table that may appear in ORDER BY
const SORTABLE_COLUMNS: &[&str] = &["id", "name", "task"];

const CREATE_TODO_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS todo (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        name TEXT NOT NULL,
        task TEXT NOT NULL,
        name_folded TEXT NOT NULL,
        task_folded TEXT NOT NULL,
        version INTEGER NOT NULL DEFAULT 1
    )
"#;

pub struct TodoStorage {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl TodoStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_timeout(pool, QUERY_TIMEOUT)
    }

    pub fn with_timeout(pool: SqlitePool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Create the `todo` table if it does not exist yet
    pub async fn ensure_schema(&self) -> StorageResult<()> {
        debug!("Ensuring todo table exists");

        self.bounded(async {
            sqlx::query(CREATE_TODO_TABLE)
                .execute(&self.pool)
                .await
                .map_err(StorageError::Sqlx)
        })
        .await?;

        Ok(())
    }

    /// Insert a new todo, filling in its id, created_at and version
    pub async fn insert(&self, todo: &mut Todo) -> StorageResult<()> {
        debug!("Inserting todo (name: {})", todo.name);

        let row = self
            .bounded(async {
                sqlx::query(
                    r#"
                    INSERT INTO todo (name, task, name_folded, task_folded)
                    VALUES (?, ?, ?, ?)
                    RETURNING id, created_at, version
                    "#,
                )
                .bind(&todo.name)
                .bind(&todo.task)
                .bind(fold_case(&todo.name))
                .bind(fold_case(&todo.task))
                .fetch_one(&self.pool)
                .await
                .map_err(StorageError::Sqlx)
            })
            .await?;

        todo.id = row.try_get("id")?;
        todo.created_at = row.try_get("created_at")?;
        todo.version = row.try_get("version")?;

        Ok(())
    }

    /// Get a single todo by ID
    pub async fn get(&self, id: i64) -> StorageResult<Todo> {
        if id < 1 {
            return Err(StorageError::NotFound);
        }

        debug!("Fetching todo: {}", id);

        let row = self
            .bounded(async {
                sqlx::query(
                    r#"
                    SELECT id, created_at, name, task, version
                    FROM todo
                    WHERE id = ?
                    "#,
                )
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(StorageError::Sqlx)
            })
            .await?;

        match row {
            Some(row) => self.row_to_todo(&row),
            None => Err(StorageError::NotFound),
        }
    }

    /// Write name and task back, provided the stored version still matches
    /// `todo.version`. On success `todo.version` holds the new version.
    pub async fn update(&self, todo: &mut Todo) -> StorageResult<()> {
        debug!("Updating todo: {} (version: {})", todo.id, todo.version);

        let new_version: Option<i32> = self
            .bounded(async {
                sqlx::query_scalar::<_, i32>(
                    r#"
                    UPDATE todo
                    SET name = ?, task = ?, name_folded = ?, task_folded = ?,
                        version = version + 1
                    WHERE id = ? AND version = ?
                    RETURNING version
                    "#,
                )
                .bind(&todo.name)
                .bind(&todo.task)
                .bind(fold_case(&todo.name))
                .bind(fold_case(&todo.task))
                .bind(todo.id)
                .bind(todo.version)
                .fetch_optional(&self.pool)
                .await
                .map_err(StorageError::Sqlx)
            })
            .await?;

        match new_version {
            Some(version) => {
                todo.version = version;
                Ok(())
            }
            None => Err(StorageError::EditConflict),
        }
    }

    /// Delete a todo permanently
    pub async fn delete(&self, id: i64) -> StorageResult<()> {
        if id < 1 {
            return Err(StorageError::NotFound);
        }

        debug!("Deleting todo: {}", id);

        let result = self
            .bounded(async {
                sqlx::query("DELETE FROM todo WHERE id = ?")
                    .bind(id)
                    .execute(&self.pool)
                    .await
                    .map_err(StorageError::Sqlx)
            })
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// List todos whose name and task contain the given filters
    /// (case-insensitive, empty matches everything), one page at a time.
    ///
    /// `filters` must have passed `validate_filters`.
    pub async fn list(
        &self,
        name: &str,
        task: &str,
        filters: &Filters,
    ) -> StorageResult<(Vec<Todo>, Metadata)> {
        // Both parts come from the static safelist, not from the request
        let column = filters.sort_column();
        let direction = filters.sort_direction().as_sql();
        if !SORTABLE_COLUMNS.contains(&column) {
            return Err(StorageError::Sqlx(sqlx::Error::ColumnNotFound(
                column.to_string(),
            )));
        }

        debug!(
            "Listing todos (name: {:?}, task: {:?}, sort: {} {}, limit: {}, offset: {})",
            name,
            task,
            column,
            direction,
            filters.limit(),
            filters.offset()
        );

        let name_pattern = contains_pattern(&fold_case(name));
        let task_pattern = contains_pattern(&fold_case(task));

        let query = format!(
            r#"
            SELECT id, created_at, name, task, version
            FROM todo
            WHERE name_folded LIKE ? ESCAPE '\'
            AND task_folded LIKE ? ESCAPE '\'
            ORDER BY {column} {direction}, id ASC
            LIMIT ? OFFSET ?
            "#
        );

        // Count and page read the same snapshot
        let (rows, total_records) = self
            .bounded(async {
                let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

                let total_records: i64 = sqlx::query_scalar(
                    r#"
                    SELECT COUNT(*)
                    FROM todo
                    WHERE name_folded LIKE ? ESCAPE '\'
                    AND task_folded LIKE ? ESCAPE '\'
                    "#,
                )
                .bind(&name_pattern)
                .bind(&task_pattern)
                .fetch_one(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;

                let rows = sqlx::query(&query)
                    .bind(&name_pattern)
                    .bind(&task_pattern)
                    .bind(filters.limit())
                    .bind(filters.offset())
                    .fetch_all(&mut *tx)
                    .await
                    .map_err(StorageError::Sqlx)?;

                tx.commit().await.map_err(StorageError::Sqlx)?;

                Ok::<_, StorageError>((rows, total_records))
            })
            .await?;

        let todos = rows
            .iter()
            .map(|row| self.row_to_todo(row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((todos, filters.metadata(total_records)))
    }

    async fn bounded<T, F>(&self, operation: F) -> StorageResult<T>
    where
        F: Future<Output = StorageResult<T>>,
    {
        match timeout(self.query_timeout, operation).await {
            Ok(result) => result,
            Err(_) => Err(StorageError::Timeout(self.query_timeout)),
        }
    }

    /// Convert a database row to a Todo
    fn row_to_todo(&self, row: &SqliteRow) -> StorageResult<Todo> {
        Ok(Todo {
            id: row.try_get("id")?,
            created_at: row.try_get("created_at")?,
            name: row.try_get("name")?,
            task: row.try_get("task")?,
            version: row.try_get("version")?,
        })
    }
}

/// Unicode lowercase form stored alongside `name` and `task` for filtering
fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

/// LIKE pattern matching `value` anywhere, with wildcards in `value` escaped
fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
