use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SituationStatus;

/// A situation under (or awaiting) acceptance testing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Situation {
    pub id: String,
    pub status: SituationStatus,
    pub user_id: Option<String>,
    /// Free-form situation data, evaluated against expected results.
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
