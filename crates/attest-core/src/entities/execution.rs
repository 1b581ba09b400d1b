use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A recorded run of an acceptance test.
///
/// `outcome` is opaque to the service layer; its shape is owned by the
/// `SituationEvaluator` that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AcceptanceTestExecution {
    pub id: String,
    pub acceptance_test_id: String,
    pub outcome: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
