use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;

pub const MISSING_BEARER: &str = "Missing Authorization bearer token";

/// Caller credential forwarded to the row-access layer
#[derive(Clone, Debug)]
pub struct CallerToken(pub String);

/// Bearer authentication middleware. The token is not verified here; the
/// data layer checks it when the caller-scoped query runs.
pub async fn bearer_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_from_headers(&headers).ok_or_else(|| {
        tracing::debug!("Rejecting request without bearer token");
        ApiError::unauthorized(MISSING_BEARER)
    })?;

    request.extensions_mut().insert(CallerToken(token));

    Ok(next.run(request).await)
}

/// Extract `Bearer <token>` (scheme case-insensitive) from Authorization
pub fn extract_bearer_from_headers(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    parse_bearer(auth_str)
}

fn parse_bearer(value: &str) -> Option<String> {
    let scheme = value.get(..6)?;
    let rest = &value[6..];
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    // At least one whitespace between scheme and token
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let token = rest.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
