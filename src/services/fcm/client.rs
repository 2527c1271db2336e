use tracing::{debug, warn};

use super::auth::ProviderCredential;
use super::models::{DeliveryOutcome, FcmMessage, PushNotification};

/// Firebase Cloud Messaging sender bound to one access token
pub struct FcmClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: String,
}

impl FcmClient {
    pub fn new(http: reqwest::Client, base_url: &str, credential: ProviderCredential) -> Self {
        let endpoint = format!(
            "{}/v1/projects/{}/messages:send",
            base_url.trim_end_matches('/'),
            credential.project_id
        );
        Self {
            http,
            endpoint,
            access_token: credential.access_token,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send to a single device. Every failure is folded into the outcome.
    pub async fn send(&self, device_token: &str, notification: &PushNotification) -> DeliveryOutcome {
        let message = FcmMessage::for_device(device_token, notification);

        let response = match self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .json(&message)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("FCM send request failed: {}", e);
                return DeliveryOutcome::unreachable(device_token, e.to_string());
            }
        };

        let status = response.status();
        if status.is_success() {
            debug!("FCM accepted message ({})", status);
            return DeliveryOutcome::delivered(device_token, status.as_u16());
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        warn!("FCM API error: {} - {}", status, error_text);
        DeliveryOutcome::rejected(device_token, status.as_u16(), error_text)
    }
}
