use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::config::{AppConfig, ConfigError, PushConfig};
use crate::database::rest::{DatabaseError, RestClient, RestCredentials};
use crate::database::service::{find_active_push_tokens, find_focus_check};
use crate::services::fcm::{exchange_access_token, DeliveryOutcome, FcmClient, FcmError, PushNotification};

pub const NO_TOKENS_REASON: &str = "No active push tokens for user";

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The configured REST base URL is unusable
    #[error("{0}")]
    Setup(DatabaseError),
    /// The caller-scoped lookup itself failed (bad filter, policy error, transport)
    #[error("{0}")]
    Lookup(DatabaseError),
    #[error("Not found (or access denied)")]
    FocusCheckNotFound,
    /// The service-role token query failed
    #[error("{0}")]
    Tokens(DatabaseError),
    #[error(transparent)]
    Provider(#[from] FcmError),
}

impl From<PushError> for crate::error::ApiError {
    fn from(err: PushError) -> Self {
        use crate::error::ApiError;
        match err {
            PushError::Config(e) => e.into(),
            PushError::Setup(e) => {
                tracing::error!("REST client setup failed: {}", e);
                ApiError::internal_server_error(e.to_string())
            }
            PushError::Lookup(e) => ApiError::bad_request(e.to_string()),
            PushError::FocusCheckNotFound => {
                ApiError::not_found(PushError::FocusCheckNotFound.to_string())
            }
            PushError::Tokens(e) => {
                tracing::error!("Push token query failed: {}", e);
                ApiError::internal_server_error(e.to_string())
            }
            PushError::Provider(e) => e.into(),
        }
    }
}

/// Aggregate of every device outcome for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushSummary {
    pub ok: bool,
    pub sent: usize,
    pub failed: usize,
    pub results: Vec<DeliveryOutcome>,
}

impl PushSummary {
    pub fn from_outcomes(results: Vec<DeliveryOutcome>) -> Self {
        let sent = results.iter().filter(|r| r.ok).count();
        let failed = results.len() - sent;
        Self {
            ok: failed == 0,
            sent,
            failed,
            results,
        }
    }
}

/// Response body of the push endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PushResponse {
    NoTokens {
        ok: bool,
        sent: usize,
        reason: &'static str,
    },
    Delivered(PushSummary),
}

impl PushResponse {
    pub fn no_tokens() -> Self {
        PushResponse::NoTokens {
            ok: true,
            sent: 0,
            reason: NO_TOKENS_REASON,
        }
    }
}

/// Notification shown for a focus check, deep-linking into the answer screen
pub fn focus_check_notification(focus_check_id: &str, push: &PushConfig) -> PushNotification {
    let data = BTreeMap::from([
        ("type".to_string(), "focus_check".to_string()),
        ("focus_check_id".to_string(), focus_check_id.to_string()),
        ("route".to_string(), format!("/focus-check?id={}", focus_check_id)),
    ]);

    PushNotification {
        title: push.title.clone(),
        body: push.body.clone(),
        data,
    }
}

/// Send to each token in order. A failing token never stops the rest.
pub async fn deliver_to_tokens(
    client: &FcmClient,
    tokens: &[String],
    notification: &PushNotification,
) -> Vec<DeliveryOutcome> {
    let mut results = Vec::with_capacity(tokens.len());
    for token in tokens {
        results.push(client.send(token, notification).await);
    }
    results
}

/// Runs the authorize → look up → exchange → fan out pipeline
pub struct PushService<'a> {
    http: &'a reqwest::Client,
    config: &'a AppConfig,
}

impl<'a> PushService<'a> {
    pub fn new(http: &'a reqwest::Client, config: &'a AppConfig) -> Self {
        Self { http, config }
    }

    pub async fn notify_focus_check(
        &self,
        caller_bearer: &str,
        focus_check_id: &str,
    ) -> Result<PushResponse, PushError> {
        let supabase = &self.config.supabase;
        let base_url = supabase.require_url()?;
        let anon_key = supabase.require_anon_key()?;
        let service_key = supabase.require_service_role_key()?;

        let rest = RestClient::new(self.http.clone(), base_url).map_err(PushError::Setup)?;

        // 1) Caller identity: row policies decide whether this focus check is visible
        let caller = RestCredentials::caller(anon_key, caller_bearer);
        let focus_check = find_focus_check(&rest, &caller, focus_check_id)
            .await
            .map_err(PushError::Lookup)?
            .ok_or(PushError::FocusCheckNotFound)?;

        // 2) Service role: read the owner's device tokens
        let service = RestCredentials::service_role(service_key);
        let tokens = find_active_push_tokens(
            &rest,
            &service,
            &focus_check.user_id,
            self.config.push.max_tokens,
        )
        .await
        .map_err(PushError::Tokens)?;

        if tokens.is_empty() {
            info!("No active push tokens for owner of focus check {}", focus_check_id);
            return Ok(PushResponse::no_tokens());
        }

        // 3) Provider credential, one exchange per request
        let firebase = &self.config.firebase;
        let service_account = firebase.require_service_account_json()?;
        let credential = exchange_access_token(self.http, service_account, &firebase.scope).await?;
        let client = FcmClient::new(self.http.clone(), &firebase.fcm_base_url, credential);

        // 4) Fan out and aggregate
        let notification = focus_check_notification(focus_check_id, &self.config.push);
        let summary = PushSummary::from_outcomes(deliver_to_tokens(&client, &tokens, &notification).await);

        if summary.ok {
            info!("Focus check {} pushed to {} device(s)", focus_check_id, summary.sent);
        } else {
            warn!(
                "Focus check {} pushed to {} device(s), {} failed",
                focus_check_id, summary.sent, summary.failed
            );
        }

        Ok(PushResponse::Delivered(summary))
    }
}
