//! Response views returned as JSON by the HTTP layer.
//!
//! Field visibility depends on who is asking. Instead of stripping properties
//! at runtime, each audience gets its own struct:
//!
//! - [`PublicView`]: anonymous callers. No owner, state, priority or rejection message.
//! - [`MemberView`]: authenticated callers. Everything, with an [`OwnerSummary`]
//!   whose detail level is chosen by [`OwnerDetail`].
//!
//! [`AcceptanceTestView::for_caller`] is the single capability check that picks one.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{AcceptanceTestExecution, ExpectedResult, PopulatedAcceptanceTest, User};
use crate::enums::{Priority, TestState};
use crate::identity::Caller;

/// How much of the owning user to expose in a [`MemberView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerDetail {
    /// Id and organization only (collection listings).
    Organization,
    /// Id, organization, email and admin flag (single record). Never the password.
    Profile,
}

/// Owning user as embedded in a [`MemberView`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub id: String,
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
}

impl OwnerSummary {
    #[must_use]
    pub fn from_user(user: &User, detail: OwnerDetail) -> Self {
        match detail {
            OwnerDetail::Organization => Self {
                id: user.id.clone(),
                organization: user.organization.clone(),
                email: None,
                is_admin: None,
            },
            OwnerDetail::Profile => Self {
                id: user.id.clone(),
                organization: user.organization.clone(),
                email: Some(user.email.clone()),
                is_admin: Some(user.is_admin),
            },
        }
    }
}

/// An execution without the back-reference to its acceptance test.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionSummary {
    pub id: String,
    pub outcome: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<&AcceptanceTestExecution> for ExecutionSummary {
    fn from(execution: &AcceptanceTestExecution) -> Self {
        Self {
            id: execution.id.clone(),
            outcome: execution.outcome.clone(),
            created_at: execution.created_at,
        }
    }
}

/// Acceptance test as shown to anonymous callers.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicView {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub situation_id: String,
    pub expected_results: Vec<ExpectedResult>,
    pub last_execution: Option<ExecutionSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&PopulatedAcceptanceTest> for PublicView {
    fn from(populated: &PopulatedAcceptanceTest) -> Self {
        let test = &populated.test;
        Self {
            id: test.id.clone(),
            name: test.name.clone(),
            description: test.description.clone(),
            keywords: test.keywords.clone(),
            situation_id: test.situation_id.clone(),
            expected_results: test.expected_results.clone(),
            last_execution: populated.last_execution.as_ref().map(ExecutionSummary::from),
            created_at: test.created_at,
            updated_at: test.updated_at,
        }
    }
}

/// Acceptance test as shown to authenticated callers.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberView {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub situation_id: String,
    pub expected_results: Vec<ExpectedResult>,
    pub user: Option<OwnerSummary>,
    pub priority: Priority,
    pub state: TestState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_message: Option<String>,
    pub last_execution: Option<ExecutionSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MemberView {
    #[must_use]
    pub fn new(populated: &PopulatedAcceptanceTest, detail: OwnerDetail) -> Self {
        let test = &populated.test;
        Self {
            id: test.id.clone(),
            name: test.name.clone(),
            description: test.description.clone(),
            keywords: test.keywords.clone(),
            situation_id: test.situation_id.clone(),
            expected_results: test.expected_results.clone(),
            user: populated
                .owner
                .as_ref()
                .map(|owner| OwnerSummary::from_user(owner, detail)),
            priority: test.priority,
            state: test.state,
            rejection_message: test.rejection_message.clone(),
            last_execution: populated.last_execution.as_ref().map(ExecutionSummary::from),
            created_at: test.created_at,
            updated_at: test.updated_at,
        }
    }
}

/// Audience-specific acceptance test representation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum AcceptanceTestView {
    Member(MemberView),
    Public(PublicView),
}

impl AcceptanceTestView {
    /// Pick the view for `caller`: anonymous gets [`PublicView`], anyone
    /// authenticated gets [`MemberView`].
    #[must_use]
    pub fn for_caller(
        caller: Option<&Caller>,
        populated: &PopulatedAcceptanceTest,
        detail: OwnerDetail,
    ) -> Self {
        match caller {
            Some(_) => Self::Member(MemberView::new(populated, detail)),
            None => Self::Public(PublicView::from(populated)),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Member(view) => &view.id,
            Self::Public(view) => &view.id,
        }
    }
}
