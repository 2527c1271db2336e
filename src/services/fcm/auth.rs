use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use tracing::debug;

use super::models::{GoogleTokenResponse, JwtClaims, ServiceAccountKey};
use super::FcmError;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Short-lived provider credential plus the project it is valid for
#[derive(Debug, Clone)]
pub struct ProviderCredential {
    pub access_token: String,
    pub project_id: String,
}

/// Parse the service account document and insist on a project id
pub fn parse_service_account(json: &str) -> Result<(ServiceAccountKey, String), FcmError> {
    let document: serde_json::Value =
        serde_json::from_str(json).map_err(|e| FcmError::InvalidServiceAccount(e.to_string()))?;

    // project_id is checked before the signing fields are required
    let project_id = document
        .get("project_id")
        .and_then(|id| id.as_str())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or(FcmError::MissingProjectId)?;

    let key: ServiceAccountKey = serde_json::from_value(document)
        .map_err(|e| FcmError::InvalidServiceAccount(e.to_string()))?;
    Ok((key, project_id))
}

/// Sign the JWT assertion presented to the token endpoint
pub fn sign_assertion(key: &ServiceAccountKey, scope: &str) -> Result<String, FcmError> {
    let now = Utc::now();
    let claims = JwtClaims {
        iss: key.client_email.clone(),
        sub: key.client_email.clone(),
        scope: scope.to_string(),
        aud: key.token_uri.clone(),
        exp: (now + Duration::hours(1)).timestamp(),
        iat: now.timestamp(),
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| FcmError::KeyParse(e.to_string()))?;

    encode(&header, &claims, &encoding_key).map_err(|e| FcmError::JwtEncode(e.to_string()))
}

/// Trade the service account for an access token scoped to `scope`.
/// One exchange per call; nothing is cached.
pub async fn exchange_access_token(
    http: &reqwest::Client,
    service_account_json: &str,
    scope: &str,
) -> Result<ProviderCredential, FcmError> {
    let (key, project_id) = parse_service_account(service_account_json)?;
    let assertion = sign_assertion(&key, scope)?;

    let params = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];

    let response = http
        .post(&key.token_uri)
        .form(&params)
        .send()
        .await
        .map_err(|e| FcmError::TokenRequest(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(FcmError::TokenRequestFailed {
            status: status.as_u16(),
            body,
        });
    }

    let token_response: GoogleTokenResponse = response
        .json()
        .await
        .map_err(|e| FcmError::TokenParse(e.to_string()))?;

    let access_token = token_response
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or(FcmError::MissingAccessToken)?;

    debug!(
        "Exchanged service account {} for access token (expires in {:?}s)",
        key.client_email, token_response.expires_in
    );

    Ok(ProviderCredential {
        access_token,
        project_id,
    })
}
