// ABOUTME: Field validation accumulator
// ABOUTME: Collects named field errors during one validation pass

use std::collections::BTreeMap;

use crate::types::Todo;

/// Maximum size of the `name` and `task` fields, in bytes
pub const MAX_FIELD_BYTES: usize = 200;

/// Collects `field -> message` failures. The first message recorded for a
/// field is kept; later ones for the same field are dropped.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    errors: BTreeMap<String, String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no failures were recorded.
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_insert_with(|| message.into());
    }

    /// Record `message` under `field` unless `ok` holds.
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add_error(field, message);
        }
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn into_errors(self) -> BTreeMap<String, String> {
        self.errors
    }
}

/// Whether `value` is one of `permitted`.
pub fn permitted_value<T: PartialEq>(value: &T, permitted: &[T]) -> bool {
    permitted.contains(value)
}

/// Validates a todo record before it is written.
pub fn validate_todo(v: &mut Validator, todo: &Todo) {
    v.check(!todo.name.is_empty(), "name", "must be provided");
    v.check(
        todo.name.len() <= MAX_FIELD_BYTES,
        "name",
        "must not be more than 200 bytes long",
    );

    v.check(!todo.task.is_empty(), "task", "must be provided");
    v.check(
        todo.task.len() <= MAX_FIELD_BYTES,
        "task",
        "must not be more than 200 bytes long",
    );
}
