//! Situation evaluation for acceptance test executions.
//!
//! An execution asks a [`SituationEvaluator`] to compute the outcome of a
//! situation against the test's expected results. The outcome is stored as
//! opaque JSON; the service never inspects it.

use attest_core::entities::{ExpectedResult, Situation};
use serde::Serialize;

use crate::error::DatabaseError;

/// Computes an execution outcome for a situation.
pub trait SituationEvaluator: Send + Sync {
    /// Evaluate `situation` against `expected`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the outcome cannot be produced.
    fn evaluate(
        &self,
        situation: &Situation,
        expected: &[ExpectedResult],
    ) -> Result<serde_json::Value, DatabaseError>;
}

/// Per-code comparison status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum ResultStatus {
    Ok,
    Ko,
    Missing,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultOutcome<'a> {
    code: &'a str,
    expected_value: &'a serde_json::Value,
    actual_value: Option<&'a serde_json::Value>,
    status: ResultStatus,
}

#[derive(Debug, Serialize)]
struct Outcome<'a> {
    status: ResultStatus,
    results: Vec<ResultOutcome<'a>>,
}

/// Default evaluator: reads each expected code as a top-level key of the
/// situation payload and compares values for equality.
///
/// The overall status is `ok` when every code matches, `missing` when any code
/// is absent from the payload, and `ko` otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct PayloadEvaluator;

impl SituationEvaluator for PayloadEvaluator {
    fn evaluate(
        &self,
        situation: &Situation,
        expected: &[ExpectedResult],
    ) -> Result<serde_json::Value, DatabaseError> {
        let results: Vec<ResultOutcome<'_>> = expected
            .iter()
            .map(|er| {
                let actual = situation.payload.get(&er.code);
                let status = match actual {
                    None => ResultStatus::Missing,
                    Some(value) if *value == er.expected_value => ResultStatus::Ok,
                    Some(_) => ResultStatus::Ko,
                };
                ResultOutcome {
                    code: &er.code,
                    expected_value: &er.expected_value,
                    actual_value: actual,
                    status,
                }
            })
            .collect();

        let status = if results.iter().any(|r| r.status == ResultStatus::Missing) {
            ResultStatus::Missing
        } else if results.iter().all(|r| r.status == ResultStatus::Ok) {
            ResultStatus::Ok
        } else {
            ResultStatus::Ko
        };

        serde_json::to_value(Outcome { status, results }).map_err(|e| DatabaseError::Other(e.into()))
    }
}
