use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Errors from the REST data layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL: {0}")]
    InvalidUrl(String),

    /// Error reported by the REST layer itself (bad filter, RLS rejection, ...)
    #[error("{message}")]
    Query { status: u16, message: String },

    #[error("JSON object requested, multiple (or no) rows returned")]
    MultipleRows,

    #[error("Failed to decode rows: {0}")]
    Decode(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Which identity a read runs under.
///
/// `caller` forwards the end user's bearer so row-level policies apply;
/// `service_role` uses the elevated key and bypasses them.
#[derive(Debug, Clone)]
pub struct RestCredentials {
    api_key: String,
    bearer: String,
}

impl RestCredentials {
    pub fn caller(anon_key: &str, caller_bearer: &str) -> Self {
        Self {
            api_key: anon_key.to_string(),
            bearer: caller_bearer.to_string(),
        }
    }

    pub fn service_role(service_key: &str) -> Self {
        Self {
            api_key: service_key.to_string(),
            bearer: service_key.to_string(),
        }
    }
}

/// Body shape of REST-layer errors, e.g. `{"code":"22P02","message":"..."}`
#[derive(Debug, Deserialize)]
struct RestErrorBody {
    message: Option<String>,
}

/// Thin client over the `/rest/v1` table endpoints
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RestClient {
    pub fn new(http: reqwest::Client, base_url: &str) -> Result<Self, DatabaseError> {
        let base_url =
            Url::parse(base_url).map_err(|e| DatabaseError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(DatabaseError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    /// Build `<base>/rest/v1/<table>?<query>`
    pub fn table_url(&self, table: &str, query: &[(&str, String)]) -> Result<Url, DatabaseError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DatabaseError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["rest", "v1", table]);
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Run a `GET` against a table and decode the returned rows
    pub async fn select<T: DeserializeOwned>(
        &self,
        credentials: &RestCredentials,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, DatabaseError> {
        let url = self.table_url(table, query)?;
        debug!("REST select on {}: {}", table, url.query().unwrap_or_default());

        let response = self
            .http
            .get(url)
            .header("apikey", &credentials.api_key)
            .header("Authorization", format!("Bearer {}", credentials.bearer))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(DatabaseError::Query {
                status: status.as_u16(),
                message: error_message(status, &text),
            });
        }

        serde_json::from_str(&text).map_err(|e| DatabaseError::Decode(e.to_string()))
    }

    /// Like `select`, but expects zero or one row
    pub async fn select_maybe_single<T: DeserializeOwned>(
        &self,
        credentials: &RestCredentials,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, DatabaseError> {
        let mut rows = self.select::<T>(credentials, table, query).await?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            _ => Err(DatabaseError::MultipleRows),
        }
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(RestErrorBody { message: Some(message) }) = serde_json::from_str(body) {
        return message;
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status.to_string()
}
