// ABOUTME: Healthcheck endpoint
// ABOUTME: Reports availability, environment and version

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn healthcheck(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "available",
        "system_info": {
            "environment": state.environment,
            "version": env!("CARGO_PKG_VERSION"),
        }
    }))
}
