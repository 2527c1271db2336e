use crate::database::models::{FocusCheck, PushToken};
use crate::database::rest::{DatabaseError, RestClient, RestCredentials};

/// Look up a focus check under the caller's identity.
///
/// Row-level policies decide visibility, so `Ok(None)` means the row either
/// does not exist or the caller may not see it.
pub async fn find_focus_check(
    client: &RestClient,
    caller: &RestCredentials,
    focus_check_id: &str,
) -> Result<Option<FocusCheck>, DatabaseError> {
    client
        .select_maybe_single(caller, FocusCheck::TABLE, &focus_check_query(focus_check_id))
        .await
}

/// Active device tokens for a user, most recently seen first
pub async fn find_active_push_tokens(
    client: &RestClient,
    service: &RestCredentials,
    user_id: &str,
    limit: usize,
) -> Result<Vec<String>, DatabaseError> {
    let rows: Vec<PushToken> = client
        .select(service, PushToken::TABLE, &push_token_query(user_id, limit))
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|row| row.token)
        .filter(|token| !token.is_empty())
        .collect())
}

fn focus_check_query(focus_check_id: &str) -> Vec<(&'static str, String)> {
    vec![
        ("select", FocusCheck::COLUMNS.to_string()),
        ("id", format!("eq.{}", focus_check_id)),
    ]
}

fn push_token_query(user_id: &str, limit: usize) -> Vec<(&'static str, String)> {
    vec![
        ("select", "token".to_string()),
        ("user_id", format!("eq.{}", user_id)),
        ("is_active", "eq.true".to_string()),
        ("order", "last_seen_at.desc".to_string()),
        ("limit", limit.to_string()),
    ]
}
