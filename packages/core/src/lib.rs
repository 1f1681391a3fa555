// ABOUTME: Core types, validation and pagination for todoinfo
// ABOUTME: Foundational package shared by the storage and API layers

pub mod filters;
pub mod types;
pub mod validator;

// Re-export main types
pub use types::{CreateTodoInput, Todo, TodoPatch};

// Re-export validation
pub use validator::{validate_todo, Validator, MAX_FIELD_BYTES};

// Re-export pagination
pub use filters::{
    validate_filters, Filters, Metadata, SortDirection, DEFAULT_PAGE_SIZE, MAX_PAGE,
    MAX_PAGE_SIZE, MIN_PAGE,
};
