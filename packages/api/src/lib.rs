// ABOUTME: HTTP API layer for todoinfo providing REST endpoints and routing
// ABOUTME: Integration layer over the core and storage packages

use std::sync::Arc;

use axum::{
    http::Method,
    routing::get,
    Router,
};

use todoinfo_storage::TodoStorage;

pub mod error;
pub mod health;
pub mod request;
pub mod todos_handlers;

pub use error::{ApiResult, AppError};

/// Shared state for API handlers, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub todos: Arc<TodoStorage>,
    pub environment: String,
}

impl AppState {
    pub fn new(todos: TodoStorage, environment: impl Into<String>) -> Self {
        Self {
            todos: Arc::new(todos),
            environment: environment.into(),
        }
    }
}

/// Creates the full API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/healthcheck", get(health::healthcheck))
        .route(
            "/v1/todoInfo",
            get(todos_handlers::list_todos).post(todos_handlers::create_todo),
        )
        .route(
            "/v1/todoInfo/{id}",
            get(todos_handlers::show_todo)
                .put(todos_handlers::update_todo)
                .patch(todos_handlers::update_todo)
                .delete(todos_handlers::delete_todo),
        )
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound
}

async fn method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed(method)
}
