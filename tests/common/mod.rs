#![allow(dead_code)]

use std::collections::HashMap;

use anyhow::{Context, Result};
use focus_push::config::{AppConfig, SupabaseConfig};
use focus_push::{app, AppState};
use serde_json::{json, Value};
use wiremock::{
    matchers::{body_partial_json, body_string_contains, header, method, path, query_param},
    Mock, MockServer, Request, Respond, ResponseTemplate,
};

pub const CALLER_JWT: &str = "eyJhbGciOiJIUzI1NiJ9.caller.signature";
pub const ANON_KEY: &str = "eyJhbGciOiJIUzI1NiJ9.anon.signature";
pub const SERVICE_KEY: &str = "eyJhbGciOiJIUzI1NiJ9.service.signature";
pub const PROJECT_ID: &str = "focus-test";
pub const ACCESS_TOKEN: &str = "ya29.test-access-token";
pub const OWNER_ID: &str = "3f0c8d52-6a4e-4b7e-9a0f-1f2d3c4b5a69";
pub const FOCUS_CHECK_ID: &str = "9b2e7f10-4c3d-4e5f-8a6b-7c8d9e0f1a2b";

pub const SEND_PATH: &str = "/v1/projects/focus-test/messages:send";

const PRIVATE_KEY_PEM: &str = include_str!("../fixtures/service_account_key.pem");

pub fn service_account_json(token_uri: &str) -> String {
    json!({
        "type": "service_account",
        "project_id": PROJECT_ID,
        "private_key_id": "test-key-id",
        "private_key": PRIVATE_KEY_PEM,
        "client_email": "push@focus-test.iam.gserviceaccount.com",
        "client_id": "1234567890",
        "token_uri": token_uri
    })
    .to_string()
}

/// App served on a free local port, with every collaborator faked by one
/// wiremock server: REST tables, the OAuth token endpoint and FCM.
pub struct TestApp {
    pub base_url: String,
    pub backend: MockServer,
    client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(|_| {}).await
    }

    pub async fn spawn_with(customize: impl FnOnce(&mut AppConfig)) -> Result<Self> {
        let backend = MockServer::start().await;

        let mut config = AppConfig::development();
        config.supabase = SupabaseConfig {
            url: Some(backend.uri()),
            anon_key: Some(ANON_KEY.to_string()),
            service_role_key: Some(SERVICE_KEY.to_string()),
        };
        config.firebase.service_account_json =
            Some(service_account_json(&format!("{}/token", backend.uri())));
        config.firebase.fcm_base_url = backend.uri();
        config.http.timeout_secs = 5;
        customize(&mut config);

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        let state = AppState::new(config)?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            backend,
            client: reqwest::Client::new(),
        })
    }

    pub fn push_url(&self) -> String {
        format!("{}/push", self.base_url)
    }

    /// POST /push as the test caller
    pub async fn post_push(&self, body: Value) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.push_url())
            .header("Authorization", format!("Bearer {}", CALLER_JWT))
            .json(&body)
            .send()
            .await?)
    }

    pub async fn requests_to(&self, request_path: &str) -> Vec<Request> {
        self.backend
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == request_path)
            .collect()
    }

    /// Caller can see the focus check, owned by `OWNER_ID`
    pub async fn mount_focus_check(&self) {
        Mock::given(method("GET"))
            .and(path("/rest/v1/focus_checks"))
            .and(query_param("id", format!("eq.{}", FOCUS_CHECK_ID)))
            .and(header("apikey", ANON_KEY))
            .and(header("authorization", format!("Bearer {}", CALLER_JWT).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": FOCUS_CHECK_ID,
                "user_id": OWNER_ID,
                "question": "Are you focused?",
                "expires_at": "2026-10-18T12:00:30+00:00"
            }])))
            .mount(&self.backend)
            .await;
    }

    /// Row policies hide the focus check (or it does not exist)
    pub async fn mount_hidden_focus_check(&self) {
        Mock::given(method("GET"))
            .and(path("/rest/v1/focus_checks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&self.backend)
            .await;
    }

    /// Active tokens for the owner, as the service role sees them
    pub async fn mount_tokens(&self, tokens: &[&str]) {
        let rows: Vec<Value> = tokens.iter().map(|t| json!({ "token": t })).collect();
        Mock::given(method("GET"))
            .and(path("/rest/v1/push_tokens"))
            .and(query_param("user_id", format!("eq.{}", OWNER_ID)))
            .and(header("apikey", SERVICE_KEY))
            .and(header("authorization", format!("Bearer {}", SERVICE_KEY).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(rows))
            .mount(&self.backend)
            .await;
    }

    pub async fn mount_token_rows(&self, responder: impl Respond + 'static) {
        Mock::given(method("GET"))
            .and(path("/rest/v1/push_tokens"))
            .respond_with(responder)
            .mount(&self.backend)
            .await;
    }

    pub async fn mount_google_token(&self) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": ACCESS_TOKEN,
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .mount(&self.backend)
            .await;
    }

    /// FCM accepts every message
    pub async fn mount_fcm_accepts_all(&self) {
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .and(header("authorization", format!("Bearer {}", ACCESS_TOKEN).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "projects/focus-test/messages/0:1700000000000000%abc"
            })))
            .mount(&self.backend)
            .await;
    }

    /// FCM rejects messages for one device token. Mount before the catch-all.
    pub async fn mount_fcm_rejects(&self, device_token: &str, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .and(body_partial_json(json!({ "message": { "token": device_token } })))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .with_priority(1)
            .mount(&self.backend)
            .await;
    }
}

/// In-memory `push_tokens` table that honours `order` and `limit`
pub struct FakePushTokens {
    /// (token, last_seen_at as unix seconds)
    pub rows: Vec<(String, i64)>,
}

impl Respond for FakePushTokens {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let params: HashMap<String, String> = request.url.query_pairs().into_owned().collect();

        let mut rows = self.rows.clone();
        match params.get("order").map(String::as_str) {
            Some("last_seen_at.desc") => rows.sort_by(|a, b| b.1.cmp(&a.1)),
            Some("last_seen_at.asc") => rows.sort_by(|a, b| a.1.cmp(&b.1)),
            _ => {}
        }
        if let Some(limit) = params.get("limit").and_then(|l| l.parse::<usize>().ok()) {
            rows.truncate(limit);
        }

        let body: Vec<Value> = rows.iter().map(|(token, _)| json!({ "token": token })).collect();
        ResponseTemplate::new(200).set_body_json(body)
    }
}
