//! Liveness check.

use axum::Json;
use serde_json::{Value, json};

/// Always healthy while the process serves requests.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "healthy": true }))
}
