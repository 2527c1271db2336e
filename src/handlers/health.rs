use axum::response::Json;
use serde_json::{json, Value};

/// GET /health - liveness only; collaborators are not probed
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
