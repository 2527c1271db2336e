use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub supabase: SupabaseConfig,
    pub firebase: FirebaseConfig,
    pub push: PushConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

/// Credentials for the two data-access tiers. Values stay optional here and
/// are required at first use, so a half-configured deployment still boots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub service_role_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirebaseConfig {
    pub service_account_json: Option<String>,
    pub fcm_base_url: String,
    pub scope: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    pub title: String,
    pub body: String,
    pub max_tokens: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing env: {0}")]
    Missing(&'static str),

    #[error("Missing env (any of): {}", .0.join(", "))]
    MissingAny(&'static [&'static str]),
}

pub const SUPABASE_URL_KEYS: &[&str] = &["SUPABASE_URL"];
pub const ANON_KEY_KEYS: &[&str] = &["SUPABASE_ANON_KEY"];
pub const SERVICE_ROLE_KEYS: &[&str] = &["SUPABASE_SERVICE_ROLE_KEY", "SERVICE_ROLE_KEY"];
pub const SERVICE_ACCOUNT_KEY: &str = "FIREBASE_SERVICE_ACCOUNT_JSON";

impl SupabaseConfig {
    pub fn require_url(&self) -> Result<&str, ConfigError> {
        self.url.as_deref().ok_or(ConfigError::Missing("SUPABASE_URL"))
    }

    pub fn require_anon_key(&self) -> Result<&str, ConfigError> {
        self.anon_key.as_deref().ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))
    }

    pub fn require_service_role_key(&self) -> Result<&str, ConfigError> {
        self.service_role_key
            .as_deref()
            .ok_or(ConfigError::MissingAny(SERVICE_ROLE_KEYS))
    }
}

impl FirebaseConfig {
    pub fn require_service_account_json(&self) -> Result<&str, ConfigError> {
        self.service_account_json
            .as_deref()
            .ok_or(ConfigError::Missing(SERVICE_ACCOUNT_KEY))
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from any key/value source. `lookup` returns the raw value.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        // Server overrides
        if let Some(v) = non_blank("FOCUS_PUSH_BIND") {
            self.server.bind = v;
        }
        if let Some(port) = non_blank("FOCUS_PUSH_PORT")
            .or_else(|| non_blank("PORT"))
            .and_then(|v| v.parse().ok())
        {
            self.server.port = port;
        }

        // HTTP client overrides
        if let Some(v) = non_blank("HTTP_TIMEOUT_SECS") {
            self.http.timeout_secs = v.parse().unwrap_or(self.http.timeout_secs);
        }

        // Secrets
        self.supabase.url = first_present(SUPABASE_URL_KEYS, &non_blank);
        self.supabase.anon_key = first_jwt_or_present(ANON_KEY_KEYS, &non_blank);
        self.supabase.service_role_key = first_jwt_or_present(SERVICE_ROLE_KEYS, &non_blank);
        self.firebase.service_account_json = non_blank(SERVICE_ACCOUNT_KEY);

        // Provider overrides
        if let Some(v) = non_blank("FCM_BASE_URL") {
            self.firebase.fcm_base_url = v.trim_end_matches('/').to_string();
        }

        // Notification copy
        if let Some(v) = non_blank("PUSH_TITLE") {
            self.push.title = v;
        }
        if let Some(v) = non_blank("PUSH_BODY") {
            self.push.body = v;
        }

        self
    }

    /// Names of required secrets that are not configured
    pub fn missing_secrets(&self) -> Vec<ConfigError> {
        let checks = [
            self.supabase.require_url().err(),
            self.supabase.require_anon_key().err(),
            self.supabase.require_service_role_key().err(),
            self.firebase.require_service_account_json().err(),
        ];
        checks.into_iter().flatten().collect()
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                bind: "127.0.0.1".to_string(),
                port: 3000,
            },
            http: HttpConfig { timeout_secs: 30 },
            supabase: SupabaseConfig::default(),
            firebase: FirebaseConfig::default(),
            push: PushConfig::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                bind: "0.0.0.0".to_string(),
                port: 8080,
            },
            http: HttpConfig { timeout_secs: 15 },
            ..Self::development()
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                bind: "0.0.0.0".to_string(),
                port: 8080,
            },
            http: HttpConfig { timeout_secs: 10 },
            ..Self::development()
        }
    }
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            service_account_json: None,
            fcm_base_url: "https://fcm.googleapis.com".to_string(),
            scope: "https://www.googleapis.com/auth/firebase.messaging".to_string(),
        }
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            title: "Instant Focus Check".to_string(),
            body: "Tap to answer within 30 seconds.".to_string(),
            max_tokens: 10,
        }
    }
}

fn looks_like_jwt(value: &str) -> bool {
    value.starts_with("eyJ")
}

fn first_present<F>(keys: &[&str], lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter().find_map(|&key| lookup(key))
}

/// Prefer a candidate that looks like a JWT; platforms sometimes set the
/// same key to an opaque value alongside a JWT alias.
fn first_jwt_or_present<F>(keys: &[&str], lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter()
        .filter_map(|&key| lookup(key))
        .find(|v| looks_like_jwt(v))
        .or_else(|| first_present(keys, lookup))
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
