// ABOUTME: API error type and its HTTP mapping
// ABOUTME: Turns validation, storage and request errors into JSON error envelopes

use std::collections::BTreeMap;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use todoinfo_storage::StorageError;

/// Main application error type that all handlers return
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed validation: {0:?}")]
    FailedValidation(BTreeMap<String, String>),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("the requested resource could not be found")]
    NotFound,

    #[error("the {0} method is not supported for this resource")]
    MethodNotAllowed(Method),

    #[error("unable to update the record due to an edit conflict, please try again")]
    EditConflict,

    #[error("storage error: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => AppError::NotFound,
            StorageError::EditConflict => AppError::EditConflict,
            other => AppError::Storage(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::FailedValidation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::EditConflict => StatusCode::CONFLICT,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Body placed under the `error` key (sanitized for external consumption)
    fn to_user_message(&self) -> Value {
        match self {
            AppError::FailedValidation(errors) => json!(errors),
            AppError::Storage(_) => {
                json!("the server encountered a problem and could not process your request")
            }
            other => json!(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_user_message();

        // Log internal errors with full context but don't expose details
        if let AppError::Storage(err) = &self {
            let request_id = Uuid::new_v4().to_string();
            error!(
                request_id = %request_id,
                storage_error = %err,
                "Storage system error"
            );
            let body = json!({ "error": message, "request_id": request_id });
            return (status, Json(body)).into_response();
        }

        // Expected business outcomes, logged at info level
        info!(
            status = %status.as_u16(),
            error = %self,
            "API error response"
        );

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;
