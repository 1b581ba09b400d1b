//! Acceptance test repository — CRUD, keyword tags, review state transitions.

use std::collections::BTreeSet;

use chrono::Utc;

use attest_core::audit_detail::{CreatedDetail, StatusChangedDetail};
use attest_core::entities::{AcceptanceTest, ExpectedResult, PopulatedAcceptanceTest};
use attest_core::enums::{AuditAction, EntityType, Priority, SituationStatus, TestState};
use attest_core::identity::Caller;
use attest_core::ids::PREFIX_ACCEPTANCE_TEST;

use crate::error::DatabaseError;
use crate::helpers::{
    format_datetime, get_opt_string, parse_datetime, parse_enum, parse_json, to_json_text,
};
use crate::service::AttestService;
use crate::updates::acceptance_test::AcceptanceTestUpdate;

pub(crate) const SELECT_COLS: &str = "t.id, t.name, t.description, t.user_id, t.situation_id, \
     t.priority, t.state, t.rejection_message, t.last_execution_id, t.created_at, t.updated_at";

/// Input for [`AttestService::create_acceptance_test`].
#[derive(Debug, Clone)]
pub struct NewAcceptanceTest {
    pub situation_id: String,
    pub name: String,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub expected_results: Vec<ExpectedResult>,
}

/// Parse the [`SELECT_COLS`] prefix of a row. Keywords and expected results
/// live in child tables and are filled in by the caller.
pub(crate) fn row_to_acceptance_test(row: &libsql::Row) -> Result<AcceptanceTest, DatabaseError> {
    Ok(AcceptanceTest {
        id: row.get(0)?,
        name: row.get(1)?,
        description: get_opt_string(row, 2)?,
        keywords: Vec::new(),
        user_id: get_opt_string(row, 3)?,
        situation_id: row.get(4)?,
        expected_results: Vec::new(),
        priority: parse_enum(&row.get::<String>(5)?)?,
        state: parse_enum(&row.get::<String>(6)?)?,
        rejection_message: get_opt_string(row, 7)?,
        last_execution_id: get_opt_string(row, 8)?,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
        updated_at: parse_datetime(&row.get::<String>(10)?)?,
    })
}

/// Drop repeated keywords, keeping first occurrence order.
fn dedup_keywords(keywords: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    keywords
        .into_iter()
        .filter(|k| seen.insert(k.clone()))
        .collect()
}

impl AttestService {
    /// Create an acceptance test owned by `owner` against an existing situation.
    ///
    /// The new test is `pending` with `normal` priority. Once stored, the
    /// situation is moved to `test`; that second write is not atomic with the
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::MissingReference` if the situation does not exist,
    /// or `DatabaseError` if any write fails.
    pub async fn create_acceptance_test(
        &self,
        owner: &Caller,
        input: NewAcceptanceTest,
    ) -> Result<AcceptanceTest, DatabaseError> {
        let situation = self
            .find_situation(&input.situation_id)
            .await?
            .ok_or_else(|| DatabaseError::MissingReference {
                entity: "situation",
                id: input.situation_id.clone(),
            })?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ACCEPTANCE_TEST).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO acceptance_tests (id, name, description, user_id, situation_id, priority, state, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                libsql::params![
                    id.as_str(),
                    input.name.as_str(),
                    input.description.as_deref(),
                    owner.user_id.as_str(),
                    situation.id.as_str(),
                    Priority::Normal.as_str(),
                    TestState::Pending.as_str(),
                    format_datetime(&now),
                    format_datetime(&now)
                ],
            )
            .await?;

        let keywords = dedup_keywords(input.keywords);
        self.replace_keywords(&id, &keywords).await?;
        self.replace_expected_results(&id, &input.expected_results)
            .await?;

        let test = AcceptanceTest {
            id: id.clone(),
            name: input.name,
            description: input.description,
            keywords,
            user_id: Some(owner.user_id.clone()),
            situation_id: situation.id.clone(),
            expected_results: input.expected_results,
            priority: Priority::Normal,
            state: TestState::Pending,
            rejection_message: None,
            last_execution_id: None,
            created_at: now,
            updated_at: now,
        };

        let detail = CreatedDetail {
            situation_id: situation.id.clone(),
        };
        self.record_audit(
            Some(&owner.user_id),
            EntityType::AcceptanceTest,
            &id,
            AuditAction::Created,
            Some(serde_json::to_value(&detail).map_err(|e| DatabaseError::Other(e.into()))?),
        )
        .await?;

        self.set_situation_status(&situation.id, SituationStatus::Test)
            .await?;

        tracing::info!(acceptance_test_id = %id, situation_id = %situation.id, "created acceptance test");
        Ok(test)
    }

    /// Fetch an acceptance test with its keywords and expected results.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no test has this id.
    pub async fn get_acceptance_test(&self, id: &str) -> Result<AcceptanceTest, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM acceptance_tests t WHERE t.id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let mut test = row_to_acceptance_test(&row)?;
        self.fill_children(&mut test).await?;
        Ok(test)
    }

    /// Fetch an acceptance test with its owner and latest execution loaded.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no test has this id.
    pub async fn get_populated_acceptance_test(
        &self,
        id: &str,
    ) -> Result<PopulatedAcceptanceTest, DatabaseError> {
        let test = self.get_acceptance_test(id).await?;
        let owner = match test.user_id.as_deref() {
            Some(user_id) => self.find_user(user_id).await?,
            None => None,
        };
        let last_execution = match test.last_execution_id.as_deref() {
            Some(execution_id) => self.find_execution(execution_id).await?,
            None => None,
        };
        Ok(PopulatedAcceptanceTest {
            test,
            owner,
            last_execution,
        })
    }

    /// Apply an update on behalf of `actor`.
    ///
    /// Priority may only be changed by an admin; a non-admin request that
    /// carries a priority is refused before anything is written.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Forbidden` for a non-admin priority change,
    /// `DatabaseError::NoResult` if the test does not exist.
    pub async fn save_update(
        &self,
        actor: &Caller,
        id: &str,
        update: AcceptanceTestUpdate,
    ) -> Result<AcceptanceTest, DatabaseError> {
        if update.priority.is_some() {
            actor.authorize_priority_change().inspect_err(|_| {
                tracing::warn!(user_id = %actor.user_id, acceptance_test_id = id, "non-admin priority change refused");
            })?;
        }

        let current = self.get_acceptance_test(id).await?;
        if update.is_empty() {
            return Ok(current);
        }

        let now = Utc::now();
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref name) = update.name {
            params.push(name.clone().into());
            sets.push(format!("name = ?{}", params.len()));
        }
        if let Some(ref description) = update.description {
            params.push(description.clone().map_or(libsql::Value::Null, Into::into));
            sets.push(format!("description = ?{}", params.len()));
        }
        if let Some(priority) = update.priority {
            params.push(priority.as_str().into());
            sets.push(format!("priority = ?{}", params.len()));
        }
        params.push(format_datetime(&now).into());
        sets.push(format!("updated_at = ?{}", params.len()));
        params.push(id.into());
        let sql = format!(
            "UPDATE acceptance_tests SET {} WHERE id = ?{}",
            sets.join(", "),
            params.len()
        );
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        if let Some(ref keywords) = update.keywords {
            self.replace_keywords(id, &dedup_keywords(keywords.clone()))
                .await?;
        }
        if let Some(ref expected_results) = update.expected_results {
            self.replace_expected_results(id, expected_results).await?;
        }

        self.record_audit(
            Some(&actor.user_id),
            EntityType::AcceptanceTest,
            id,
            AuditAction::Updated,
            Some(serde_json::to_value(&update).map_err(|e| DatabaseError::Other(e.into()))?),
        )
        .await?;

        tracing::info!(acceptance_test_id = id, "updated acceptance test");
        self.get_acceptance_test(id).await
    }

    /// Move a test through its review workflow.
    ///
    /// Only admins may move a test to `validated` or `rejected`; the owner or
    /// an admin may send it back to `pending`. The rejection message is kept
    /// only while the test is rejected.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Forbidden` when the actor lacks the capability,
    /// `DatabaseError::InvalidState` for a disallowed transition,
    /// `DatabaseError::NoResult` if the test does not exist.
    pub async fn update_validation_state(
        &self,
        actor: &Caller,
        id: &str,
        new_state: TestState,
        rejection_message: Option<&str>,
    ) -> Result<AcceptanceTest, DatabaseError> {
        let current = self.get_acceptance_test(id).await?;

        actor.authorize_state_change(current.user_id.as_deref(), new_state)?;
        current.state.transition_to(new_state, id)?;

        let rejection_message = match new_state {
            TestState::Rejected => rejection_message.map(String::from),
            TestState::Pending | TestState::Validated => None,
        };

        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE acceptance_tests SET state = ?1, rejection_message = ?2, updated_at = ?3 WHERE id = ?4",
                libsql::params![
                    new_state.as_str(),
                    rejection_message.as_deref(),
                    format_datetime(&now),
                    id
                ],
            )
            .await?;

        let detail = StatusChangedDetail {
            from: current.state.as_str().to_string(),
            to: new_state.as_str().to_string(),
            reason: rejection_message.clone(),
        };
        self.record_audit(
            Some(&actor.user_id),
            EntityType::AcceptanceTest,
            id,
            AuditAction::StatusChanged,
            Some(serde_json::to_value(&detail).map_err(|e| DatabaseError::Other(e.into()))?),
        )
        .await?;

        tracing::info!(acceptance_test_id = id, from = %current.state, to = %new_state, "validation state changed");

        Ok(AcceptanceTest {
            state: new_state,
            rejection_message,
            updated_at: now,
            ..current
        })
    }

    /// Delete a test together with its executions, keywords and expected
    /// results.
    ///
    /// Child rows go through `ON DELETE CASCADE`, so the whole removal is one
    /// statement. Never open an explicit transaction on the shared connection.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the test does not exist.
    pub async fn remove_all_acceptance_test(&self, id: &str) -> Result<(), DatabaseError> {
        let removed = self
            .db()
            .conn()
            .execute("DELETE FROM acceptance_tests WHERE id = ?1", [id])
            .await?;
        if removed == 0 {
            return Err(DatabaseError::NoResult);
        }

        tracing::info!(acceptance_test_id = id, "removed acceptance test");
        Ok(())
    }

    /// Sorted distinct keywords across all acceptance tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn distinct_keywords(&self) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT DISTINCT keyword FROM acceptance_test_keywords ORDER BY keyword",
                (),
            )
            .await?;
        let mut keywords = Vec::new();
        while let Some(row) = rows.next().await? {
            keywords.push(row.get::<String>(0)?);
        }
        Ok(keywords)
    }

    /// Sorted distinct organizations of acceptance test owners.
    ///
    /// Streams one row per test/owner pair and accumulates organizations in a
    /// set, so memory is bounded by the number of distinct organizations.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn distinct_organizations(&self) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT u.organization FROM acceptance_tests t JOIN users u ON u.id = t.user_id",
                (),
            )
            .await?;
        let mut organizations = BTreeSet::new();
        while let Some(row) = rows.next().await? {
            if let Some(organization) = get_opt_string(&row, 0)? {
                organizations.insert(organization);
            }
        }
        Ok(organizations.into_iter().collect())
    }

    /// Load keywords and expected results into `test`.
    pub(crate) async fn fill_children(&self, test: &mut AcceptanceTest) -> Result<(), DatabaseError> {
        test.keywords = self.load_keywords(&test.id).await?;
        test.expected_results = self.load_expected_results(&test.id).await?;
        Ok(())
    }

    async fn load_keywords(&self, id: &str) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT keyword FROM acceptance_test_keywords WHERE acceptance_test_id = ?1 ORDER BY position",
                [id],
            )
            .await?;
        let mut keywords = Vec::new();
        while let Some(row) = rows.next().await? {
            keywords.push(row.get::<String>(0)?);
        }
        Ok(keywords)
    }

    async fn load_expected_results(&self, id: &str) -> Result<Vec<ExpectedResult>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT code, expected_value FROM acceptance_test_expected_results
                 WHERE acceptance_test_id = ?1 ORDER BY position",
                [id],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(ExpectedResult {
                code: row.get::<String>(0)?,
                expected_value: parse_json(&row.get::<String>(1)?)?,
            });
        }
        Ok(results)
    }

    async fn replace_keywords(&self, id: &str, keywords: &[String]) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                "DELETE FROM acceptance_test_keywords WHERE acceptance_test_id = ?1",
                [id],
            )
            .await?;
        for (position, keyword) in (0_i64..).zip(keywords) {
            self.db()
                .conn()
                .execute(
                    "INSERT OR IGNORE INTO acceptance_test_keywords (acceptance_test_id, position, keyword)
                     VALUES (?1, ?2, ?3)",
                    libsql::params![id, position, keyword.as_str()],
                )
                .await?;
        }
        Ok(())
    }

    async fn replace_expected_results(
        &self,
        id: &str,
        expected_results: &[ExpectedResult],
    ) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                "DELETE FROM acceptance_test_expected_results WHERE acceptance_test_id = ?1",
                [id],
            )
            .await?;
        for (position, er) in (0_i64..).zip(expected_results) {
            self.db()
                .conn()
                .execute(
                    "INSERT INTO acceptance_test_expected_results (acceptance_test_id, position, code, expected_value)
                     VALUES (?1, ?2, ?3, ?4)",
                    libsql::params![id, position, er.code.as_str(), to_json_text(&er.expected_value)?],
                )
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::audit::AuditFilter;
    use crate::test_support::helpers::{
        caller_for, create_test_situation, create_test_user, new_test, test_service,
    };
    use crate::updates::acceptance_test::AcceptanceTestUpdateBuilder;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn create_sets_defaults_and_moves_situation_to_test() {
        let svc = test_service().await;
        let user = create_test_user(&svc, "owner@example.org", Some("caf"), false).await;
        let situation = create_test_situation(&svc, &user, serde_json::json!({})).await;

        let test = svc
            .create_acceptance_test(
                &caller_for(&user),
                new_test(&situation.id, "Housing", &["housing", "apl", "housing"]),
            )
            .await
            .unwrap();

        assert!(test.id.starts_with("act-"));
        assert_eq!(test.state, TestState::Pending);
        assert_eq!(test.priority, Priority::Normal);
        assert_eq!(test.keywords, vec!["housing", "apl"]);
        assert_eq!(test.user_id.as_deref(), Some(user.id.as_str()));

        let fetched = svc.get_acceptance_test(&test.id).await.unwrap();
        assert_eq!(fetched, test);

        let situation = svc.get_situation(&situation.id).await.unwrap();
        assert_eq!(situation.status, SituationStatus::Test);
    }

    #[tokio::test]
    async fn create_with_missing_situation_is_missing_reference() {
        let svc = test_service().await;
        let user = create_test_user(&svc, "owner@example.org", None, false).await;

        let result = svc
            .create_acceptance_test(&caller_for(&user), new_test("sit-deadbeef", "Orphan", &[]))
            .await;
        assert!(matches!(
            result,
            Err(DatabaseError::MissingReference { entity: "situation", .. })
        ));
    }

    #[tokio::test]
    async fn populated_test_loads_owner() {
        let svc = test_service().await;
        let user = create_test_user(&svc, "owner@example.org", Some("caf"), false).await;
        let situation = create_test_situation(&svc, &user, serde_json::json!({})).await;
        let test = svc
            .create_acceptance_test(&caller_for(&user), new_test(&situation.id, "T", &[]))
            .await
            .unwrap();

        let populated = svc.get_populated_acceptance_test(&test.id).await.unwrap();
        assert_eq!(populated.owner.unwrap().id, user.id);
        assert!(populated.last_execution.is_none());
    }

    #[tokio::test]
    async fn save_update_changes_fields() {
        let svc = test_service().await;
        let user = create_test_user(&svc, "owner@example.org", None, false).await;
        let situation = create_test_situation(&svc, &user, serde_json::json!({})).await;
        let test = svc
            .create_acceptance_test(&caller_for(&user), new_test(&situation.id, "Old", &["a"]))
            .await
            .unwrap();

        let update = AcceptanceTestUpdateBuilder::new()
            .name("New")
            .description(Some("Described".into()))
            .keywords(vec!["b".into(), "c".into()])
            .expected_results(vec![ExpectedResult {
                code: "rsa".into(),
                expected_value: serde_json::json!(0),
            }])
            .build();
        let updated = svc
            .save_update(&caller_for(&user), &test.id, update)
            .await
            .unwrap();

        assert_eq!(updated.name, "New");
        assert_eq!(updated.description.as_deref(), Some("Described"));
        assert_eq!(updated.keywords, vec!["b", "c"]);
        assert_eq!(updated.expected_results.len(), 1);
        assert_eq!(updated.expected_results[0].code, "rsa");
        assert!(updated.updated_at >= test.updated_at);

        let audits = svc
            .query_audit(&AuditFilter {
                entity_id: Some(test.id.clone()),
                action: Some(AuditAction::Updated),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(audits.len(), 1);
        assert_eq!(audits[0].detail.as_ref().unwrap()["name"], "New");
    }

    #[tokio::test]
    async fn non_admin_priority_change_is_forbidden_and_has_no_effect() {
        let svc = test_service().await;
        let user = create_test_user(&svc, "owner@example.org", None, false).await;
        let situation = create_test_situation(&svc, &user, serde_json::json!({})).await;
        let test = svc
            .create_acceptance_test(&caller_for(&user), new_test(&situation.id, "T", &[]))
            .await
            .unwrap();

        let update = AcceptanceTestUpdateBuilder::new()
            .name("Renamed")
            .priority(Priority::High)
            .build();
        let result = svc.save_update(&caller_for(&user), &test.id, update).await;
        assert!(matches!(result, Err(DatabaseError::Forbidden(_))));

        let fetched = svc.get_acceptance_test(&test.id).await.unwrap();
        assert_eq!(fetched.priority, Priority::Normal);
        assert_eq!(fetched.name, "T");
    }

    #[tokio::test]
    async fn admin_priority_change_applies() {
        let svc = test_service().await;
        let owner = create_test_user(&svc, "owner@example.org", None, false).await;
        let admin = create_test_user(&svc, "admin@example.org", None, true).await;
        let situation = create_test_situation(&svc, &owner, serde_json::json!({})).await;
        let test = svc
            .create_acceptance_test(&caller_for(&owner), new_test(&situation.id, "T", &[]))
            .await
            .unwrap();

        let update = AcceptanceTestUpdateBuilder::new()
            .priority(Priority::High)
            .build();
        let updated = svc
            .save_update(&caller_for(&admin), &test.id, update)
            .await
            .unwrap();
        assert_eq!(updated.priority, Priority::High);
    }

    #[tokio::test]
    async fn save_update_on_missing_test() {
        let svc = test_service().await;
        let user = create_test_user(&svc, "owner@example.org", None, false).await;
        let update = AcceptanceTestUpdateBuilder::new().name("x").build();
        let result = svc
            .save_update(&caller_for(&user), "act-deadbeef", update)
            .await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn admin_rejects_then_owner_reopens() {
        let svc = test_service().await;
        let owner = create_test_user(&svc, "owner@example.org", None, false).await;
        let admin = create_test_user(&svc, "admin@example.org", None, true).await;
        let situation = create_test_situation(&svc, &owner, serde_json::json!({})).await;
        let test = svc
            .create_acceptance_test(&caller_for(&owner), new_test(&situation.id, "T", &[]))
            .await
            .unwrap();

        let rejected = svc
            .update_validation_state(
                &caller_for(&admin),
                &test.id,
                TestState::Rejected,
                Some("wrong amount"),
            )
            .await
            .unwrap();
        assert_eq!(rejected.state, TestState::Rejected);
        assert_eq!(rejected.rejection_message.as_deref(), Some("wrong amount"));

        let reopened = svc
            .update_validation_state(&caller_for(&owner), &test.id, TestState::Pending, None)
            .await
            .unwrap();
        assert_eq!(reopened.state, TestState::Pending);
        assert_eq!(reopened.rejection_message, None);

        let fetched = svc.get_acceptance_test(&test.id).await.unwrap();
        assert_eq!(fetched.rejection_message, None);
    }

    #[tokio::test]
    async fn non_admin_cannot_validate() {
        let svc = test_service().await;
        let owner = create_test_user(&svc, "owner@example.org", None, false).await;
        let situation = create_test_situation(&svc, &owner, serde_json::json!({})).await;
        let test = svc
            .create_acceptance_test(&caller_for(&owner), new_test(&situation.id, "T", &[]))
            .await
            .unwrap();

        let result = svc
            .update_validation_state(&caller_for(&owner), &test.id, TestState::Validated, None)
            .await;
        assert!(matches!(result, Err(DatabaseError::Forbidden(_))));
    }

    #[tokio::test]
    async fn same_state_transition_is_invalid() {
        let svc = test_service().await;
        let admin = create_test_user(&svc, "admin@example.org", None, true).await;
        let situation = create_test_situation(&svc, &admin, serde_json::json!({})).await;
        let test = svc
            .create_acceptance_test(&caller_for(&admin), new_test(&situation.id, "T", &[]))
            .await
            .unwrap();

        let result = svc
            .update_validation_state(&caller_for(&admin), &test.id, TestState::Pending, None)
            .await;
        assert!(matches!(result, Err(DatabaseError::InvalidState(_))));
    }

    #[tokio::test]
    async fn remove_all_deletes_children() {
        let svc = test_service().await;
        let user = create_test_user(&svc, "owner@example.org", None, false).await;
        let situation = create_test_situation(&svc, &user, serde_json::json!({"af": 131.16})).await;
        let test = svc
            .create_acceptance_test(&caller_for(&user), new_test(&situation.id, "T", &["k"]))
            .await
            .unwrap();
        svc.execute_acceptance_test(&caller_for(&user), &test.id)
            .await
            .unwrap();
        svc.execute_acceptance_test(&caller_for(&user), &test.id)
            .await
            .unwrap();

        svc.remove_all_acceptance_test(&test.id).await.unwrap();

        assert!(matches!(
            svc.get_acceptance_test(&test.id).await,
            Err(DatabaseError::NoResult)
        ));
        for table in [
            "acceptance_test_executions",
            "acceptance_test_keywords",
            "acceptance_test_expected_results",
        ] {
            let mut rows = svc
                .db()
                .conn()
                .query(
                    &format!("SELECT COUNT(*) FROM {table} WHERE acceptance_test_id = ?1"),
                    [test.id.as_str()],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap().unwrap();
            assert_eq!(row.get::<i64>(0).unwrap(), 0, "orphans left in {table}");
        }
    }

    #[tokio::test]
    async fn remove_missing_test_is_no_result() {
        let svc = test_service().await;
        let result = svc.remove_all_acceptance_test("act-deadbeef").await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn distinct_keywords_and_organizations() {
        let svc = test_service().await;
        let caf = create_test_user(&svc, "a@example.org", Some("caf"), false).await;
        let msa = create_test_user(&svc, "b@example.org", Some("msa"), false).await;
        let none = create_test_user(&svc, "c@example.org", None, false).await;
        let caf2 = create_test_user(&svc, "d@example.org", Some("caf"), false).await;

        for (user, keywords) in [
            (&caf, vec!["rsa", "apl"]),
            (&msa, vec!["apl"]),
            (&none, vec!["af"]),
            (&caf2, vec![]),
        ] {
            let situation = create_test_situation(&svc, user, serde_json::json!({})).await;
            svc.create_acceptance_test(&caller_for(user), new_test(&situation.id, "T", &keywords))
                .await
                .unwrap();
        }

        assert_eq!(svc.distinct_keywords().await.unwrap(), vec!["af", "apl", "rsa"]);
        assert_eq!(svc.distinct_organizations().await.unwrap(), vec!["caf", "msa"]);
    }
}
