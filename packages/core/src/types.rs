// ABOUTME: Todo record type definitions
// ABOUTME: The stored record plus the create and partial-update inputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single todo record as stored in the `todo` table.
///
/// `id`, `created_at` and `version` are assigned by the store. `version`
/// starts at 1 and is bumped by exactly one on every successful update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Todo {
    pub id: i64,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub task: String,
    pub version: i32,
}

impl Todo {
    /// Build an unsaved record; the store fills in id, created_at and version.
    pub fn new(name: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            id: 0,
            created_at: DateTime::<Utc>::default(),
            name: name.into(),
            task: task.into(),
            version: 0,
        }
    }
}

/// Request body for creating a todo.
///
/// Missing fields decode as empty strings so that validation, not the JSON
/// decoder, reports them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTodoInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub task: String,
}

impl From<CreateTodoInput> for Todo {
    fn from(input: CreateTodoInput) -> Self {
        Todo::new(input.name, input.task)
    }
}

/// Partial update. Only the fields present in the request are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TodoPatch {
    pub name: Option<String>,
    pub task: Option<String>,
    /// Version the client last read. When present the write is checked
    /// against it instead of the version loaded just before the update.
    pub version: Option<i32>,
}

impl TodoPatch {
    /// True when neither `name` nor `task` is present
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.task.is_none()
    }

    /// Merge the present fields into `todo`, leaving the others untouched.
    pub fn apply_to(self, todo: &mut Todo) {
        if let Some(name) = self.name {
            todo.name = name;
        }
        if let Some(task) = self.task {
            todo.task = task;
        }
        if let Some(version) = self.version {
            todo.version = version;
        }
    }
}
