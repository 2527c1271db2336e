use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Firebase service account document (the JSON downloaded from the console)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    pub project_id: Option<String>,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// JWT Claims for the OAuth2 JWT-bearer grant
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub iss: String,
    pub sub: String,
    pub scope: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
}

/// Google OAuth2 Token Response
#[derive(Debug, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<i64>,
}

/// What a device should display and carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
}

/// FCM v1 `messages:send` request
#[derive(Debug, Serialize)]
pub struct FcmMessage {
    pub message: FcmMessageContent,
}

#[derive(Debug, Serialize)]
pub struct FcmMessageContent {
    pub token: String,
    pub notification: FcmNotification,
    pub data: BTreeMap<String, String>,
    pub android: AndroidConfig,
    pub apns: ApnsConfig,
}

#[derive(Debug, Serialize)]
pub struct FcmNotification {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct AndroidConfig {
    pub priority: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ApnsConfig {
    pub headers: ApnsHeaders,
    pub payload: ApnsPayload,
}

#[derive(Debug, Serialize)]
pub struct ApnsHeaders {
    #[serde(rename = "apns-priority")]
    pub apns_priority: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ApnsPayload {
    pub aps: Aps,
}

#[derive(Debug, Serialize)]
pub struct Aps {
    pub sound: &'static str,
    #[serde(rename = "contentAvailable")]
    pub content_available: bool,
}

impl FcmMessage {
    /// High priority on Android; immediate delivery plus a background wake on iOS
    pub fn for_device(device_token: &str, notification: &PushNotification) -> Self {
        Self {
            message: FcmMessageContent {
                token: device_token.to_string(),
                notification: FcmNotification {
                    title: notification.title.clone(),
                    body: notification.body.clone(),
                },
                data: notification.data.clone(),
                android: AndroidConfig { priority: "high" },
                apns: ApnsConfig {
                    headers: ApnsHeaders { apns_priority: "10" },
                    payload: ApnsPayload {
                        aps: Aps {
                            sound: "default",
                            content_available: true,
                        },
                    },
                },
            },
        }
    }
}

/// Outcome of one device delivery. Never an error: failures are data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    pub token: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeliveryOutcome {
    pub fn delivered(token: &str, status: u16) -> Self {
        Self {
            token: token.to_string(),
            ok: true,
            status: Some(status),
            error: None,
        }
    }

    pub fn rejected(token: &str, status: u16, body: String) -> Self {
        Self {
            token: token.to_string(),
            ok: false,
            status: Some(status),
            error: Some(body),
        }
    }

    pub fn unreachable(token: &str, error: String) -> Self {
        Self {
            token: token.to_string(),
            ok: false,
            status: None,
            error: Some(error),
        }
    }
}
