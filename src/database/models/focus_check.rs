use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Row of `focus_checks` as visible to the caller.
///
/// Only `user_id` drives the push; the other columns are carried as raw JSON
/// so their column types never fail the lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusCheck {
    #[serde(default)]
    pub id: Value,
    pub user_id: String,
    #[serde(default)]
    pub question: Value,
    #[serde(default)]
    pub expires_at: Value,
}

impl FocusCheck {
    pub const TABLE: &'static str = "focus_checks";
    pub const COLUMNS: &'static str = "id,user_id,question,expires_at";
}
