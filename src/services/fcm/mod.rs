//! Firebase Cloud Messaging: service-account token exchange and v1 sends.

pub mod auth;
pub mod client;
pub mod models;

use thiserror::Error;

pub use auth::{exchange_access_token, ProviderCredential};
pub use client::FcmClient;
pub use models::{DeliveryOutcome, PushNotification, ServiceAccountKey};

/// Failures before any device is contacted. Per-device failures are
/// reported through `DeliveryOutcome` instead.
#[derive(Error, Debug)]
pub enum FcmError {
    #[error("Invalid service account JSON: {0}")]
    InvalidServiceAccount(String),

    #[error("Missing project_id in service account JSON")]
    MissingProjectId,

    #[error("Failed to parse private key: {0}")]
    KeyParse(String),

    #[error("Failed to encode JWT: {0}")]
    JwtEncode(String),

    #[error("Failed to get access token: {0}")]
    TokenRequest(String),

    #[error("Token request failed with status: {status} - {body}")]
    TokenRequestFailed { status: u16, body: String },

    #[error("Failed to parse token response: {0}")]
    TokenParse(String),

    #[error("Failed to get Google access token")]
    MissingAccessToken,
}
