use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::User;
use crate::enums::TestState;
use crate::errors::CoreError;

/// Authenticated caller identity for cross-crate passing.
///
/// Resolved by `attest-server` from the upstream-asserted user id header,
/// consumed by `attest-db` for permission scoping. Anonymous callers are
/// represented as `Option<Caller>::None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Caller {
    pub user_id: String,
    pub organization: Option<String>,
    pub is_admin: bool,
}

impl Caller {
    /// Whether the caller owns a record whose owner is `owner_id`.
    #[must_use]
    pub fn owns(&self, owner_id: Option<&str>) -> bool {
        owner_id == Some(self.user_id.as_str())
    }

    /// Only admins may change an acceptance test's priority.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Forbidden` for non-admin callers.
    pub fn authorize_priority_change(&self) -> Result<(), CoreError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(CoreError::Forbidden(
                "only administrators may change priority".into(),
            ))
        }
    }

    /// Review decisions (`validated`, `rejected`) are admin-only; the owner or
    /// an admin may send a test back to `pending`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Forbidden` when the caller lacks the capability.
    pub fn authorize_state_change(
        &self,
        owner_id: Option<&str>,
        next: TestState,
    ) -> Result<(), CoreError> {
        let permitted = if next.is_review_decision() {
            self.is_admin
        } else {
            self.is_admin || self.owns(owner_id)
        };
        if permitted {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "not allowed to move acceptance test to {next}"
            )))
        }
    }
}

impl From<&User> for Caller {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            organization: user.organization.clone(),
            is_admin: user.is_admin,
        }
    }
}
