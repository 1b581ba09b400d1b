//! Acceptance test execution repository.

use chrono::Utc;

use attest_core::audit_detail::ExecutedDetail;
use attest_core::entities::AcceptanceTestExecution;
use attest_core::enums::{AuditAction, EntityType};
use attest_core::identity::Caller;
use attest_core::ids::PREFIX_EXECUTION;
use attest_core::responses::ExecutionSummary;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, parse_datetime, parse_json, to_json_text};
use crate::service::AttestService;

const SELECT_COLS: &str = "id, acceptance_test_id, outcome, created_at";

fn row_to_execution(row: &libsql::Row) -> Result<AcceptanceTestExecution, DatabaseError> {
    Ok(AcceptanceTestExecution {
        id: row.get(0)?,
        acceptance_test_id: row.get(1)?,
        outcome: parse_json(&row.get::<String>(2)?)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

impl AttestService {
    /// Run an acceptance test against its situation and record the outcome.
    ///
    /// The new execution becomes the test's `last_execution_id`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the test does not exist, or any
    /// error raised by the evaluator.
    pub async fn execute_acceptance_test(
        &self,
        actor: &Caller,
        acceptance_test_id: &str,
    ) -> Result<AcceptanceTestExecution, DatabaseError> {
        let test = self.get_acceptance_test(acceptance_test_id).await?;
        let situation = self.get_situation(&test.situation_id).await?;
        let outcome = self
            .evaluator()
            .evaluate(&situation, &test.expected_results)?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_EXECUTION).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO acceptance_test_executions (id, acceptance_test_id, outcome, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                libsql::params![
                    id.as_str(),
                    acceptance_test_id,
                    to_json_text(&outcome)?,
                    format_datetime(&now)
                ],
            )
            .await?;

        self.db()
            .conn()
            .execute(
                "UPDATE acceptance_tests SET last_execution_id = ?1 WHERE id = ?2",
                libsql::params![id.as_str(), acceptance_test_id],
            )
            .await?;

        let detail = ExecutedDetail {
            execution_id: id.clone(),
        };
        self.record_audit(
            Some(&actor.user_id),
            EntityType::AcceptanceTest,
            acceptance_test_id,
            AuditAction::Executed,
            Some(serde_json::to_value(&detail).map_err(|e| DatabaseError::Other(e.into()))?),
        )
        .await?;

        tracing::info!(acceptance_test_id, execution_id = %id, "executed acceptance test");

        Ok(AcceptanceTestExecution {
            id,
            acceptance_test_id: acceptance_test_id.to_string(),
            outcome,
            created_at: now,
        })
    }

    pub async fn get_execution(&self, id: &str) -> Result<AcceptanceTestExecution, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM acceptance_test_executions WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_execution(&row)
    }

    /// Look up an execution, mapping a missing row to `None`.
    pub async fn find_execution(
        &self,
        id: &str,
    ) -> Result<Option<AcceptanceTestExecution>, DatabaseError> {
        match self.get_execution(id).await {
            Ok(execution) => Ok(Some(execution)),
            Err(DatabaseError::NoResult) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Executions of an acceptance test, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_executions(
        &self,
        acceptance_test_id: &str,
    ) -> Result<Vec<ExecutionSummary>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM acceptance_test_executions
                     WHERE acceptance_test_id = ?1
                     ORDER BY created_at DESC, rowid DESC"
                ),
                [acceptance_test_id],
            )
            .await?;

        let mut executions = Vec::new();
        while let Some(row) = rows.next().await? {
            executions.push(ExecutionSummary::from(&row_to_execution(&row)?));
        }
        Ok(executions)
    }
}
