use serde::{Deserialize, Serialize};

/// Projection of `push_tokens` holding only the device token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushToken {
    #[serde(default)]
    pub token: Option<String>,
}

impl PushToken {
    pub const TABLE: &'static str = "push_tokens";
}
