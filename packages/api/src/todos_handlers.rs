// ABOUTME: HTTP request handlers for todo operations
// ABOUTME: Handles CRUD and filtered listing of todos with database integration

use std::collections::HashMap;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::{debug, info};

use todoinfo_core::{
    validate_filters, validate_todo, CreateTodoInput, Filters, Todo, TodoPatch, Validator,
    DEFAULT_PAGE_SIZE, MIN_PAGE,
};
use todoinfo_storage::TODO_SORT_SAFELIST;

use crate::error::{ApiResult, AppError};
use crate::request::{read_id_param, read_int, read_string};
use crate::AppState;

/// Path of a single todo, as used in the `Location` header
pub fn todo_location(id: i64) -> String {
    format!("/v1/todoInfo/{}", id)
}

fn check_todo(todo: &Todo) -> ApiResult<()> {
    let mut v = Validator::new();
    validate_todo(&mut v, todo);
    if !v.valid() {
        return Err(AppError::FailedValidation(v.into_errors()));
    }
    Ok(())
}

/// Create a new todo
pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoInput>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = payload?;
    info!("Creating todo: {}", input.name);

    let mut todo = Todo::from(input);
    check_todo(&todo)?;

    state.todos.insert(&mut todo).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, todo_location(todo.id))],
        Json(json!({ "todo": todo })),
    ))
}

/// Get a single todo by ID
pub async fn show_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = read_id_param(&id)?;
    info!("Getting todo: {}", id);

    let todo = state.todos.get(id).await?;
    Ok(Json(json!({ "todo": todo })))
}

/// Partially update a todo; omitted fields keep their stored values
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TodoPatch>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = read_id_param(&id)?;
    info!("Updating todo: {}", id);

    let mut todo = state.todos.get(id).await?;

    let Json(patch) = payload?;
    if patch.is_empty() {
        debug!("Update for todo {} carries no field changes", id);
    }
    patch.apply_to(&mut todo);
    check_todo(&todo)?;

    state.todos.update(&mut todo).await?;
    Ok(Json(json!({ "todo": todo })))
}

/// Delete a todo
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = read_id_param(&id)?;
    info!("Deleting todo: {}", id);

    state.todos.delete(id).await?;
    Ok(Json(json!({ "message": "todo successfully deleted" })))
}

/// List todos filtered by name/task, sorted and paginated
pub async fn list_todos(
    State(state): State<AppState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(qs) = query?;
    let mut v = Validator::new();

    let name = read_string(&qs, "name", "");
    let task = read_string(&qs, "task", "");
    let filters = Filters::new(
        read_int(&qs, "page", MIN_PAGE, &mut v),
        read_int(&qs, "page_size", DEFAULT_PAGE_SIZE, &mut v),
        read_string(&qs, "sort", "id"),
        TODO_SORT_SAFELIST,
    );

    validate_filters(&mut v, &filters);
    if !v.valid() {
        return Err(AppError::FailedValidation(v.into_errors()));
    }

    info!(
        "Listing todos (page: {}, page_size: {}, sort: {})",
        filters.page, filters.page_size, filters.sort
    );

    let (todos, metadata) = state.todos.list(&name, &task, &filters).await?;
    Ok(Json(json!({ "todo": todos, "metadata": metadata })))
}
