use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A registered user. The password hash is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    #[schemars(skip)]
    pub password_hash: String,
    pub organization: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}
