// handlers/push.rs - POST /push handler

use axum::{
    body::Bytes,
    extract::{Extension, State},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CallerToken;
use crate::services::{PushResponse, PushService};

/// POST /push - notify the owner of a focus check on all active devices
///
/// Expected Input:
/// ```json
/// { "focus_check_id": "<uuid>" }
/// ```
///
/// The caller's bearer must be able to read the focus check through row
/// policies; otherwise the response is 404 whether or not the row exists.
pub async fn push_post(
    State(state): State<AppState>,
    Extension(CallerToken(bearer)): Extension<CallerToken>,
    body: Bytes,
) -> Result<Json<PushResponse>, ApiError> {
    // Parsed by hand so a missing Content-Type still reads as JSON
    let payload: Value = serde_json::from_slice(&body).map_err(|_| ApiError::InvalidJson)?;

    let focus_check_id = focus_check_id(&payload)
        .ok_or_else(|| ApiError::bad_request("focus_check_id required"))?;

    info!("Push requested for focus check {}", focus_check_id);

    let response = PushService::new(&state.http, &state.config)
        .notify_focus_check(&bearer, &focus_check_id)
        .await?;

    Ok(Json(response))
}

/// Any method other than POST on the push routes
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Read `focus_check_id` as text. Strings are trimmed, scalars are rendered,
/// anything else counts as missing.
fn focus_check_id(payload: &Value) -> Option<String> {
    let raw = match payload.get("focus_check_id")? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if raw.is_empty() {
        None
    } else {
        Some(raw)
    }
}
