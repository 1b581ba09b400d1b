//! Service layer orchestrating database mutations with audit.
//!
//! `AttestService` wraps `AttestDb` (raw database access) and the
//! `SituationEvaluator` used by executions. All repo methods are implemented
//! as `impl AttestService` blocks in `repos/`.

use crate::AttestDb;
use crate::error::DatabaseError;
use crate::evaluator::{PayloadEvaluator, SituationEvaluator};

/// Orchestrates database mutations with an audit trail.
///
/// Every mutation method follows this protocol:
/// 1. Execute SQL
/// 2. Append audit entry
///
/// All requests share one connection, so no method opens an explicit
/// transaction; multi-row removal relies on `ON DELETE CASCADE`.
pub struct AttestService {
    db: AttestDb,
    evaluator: Box<dyn SituationEvaluator>,
}

impl AttestService {
    /// Create a new service over a local database with the default evaluator.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = AttestDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create from an existing `AttestDb` with the default evaluator.
    #[must_use]
    pub fn from_db(db: AttestDb) -> Self {
        Self {
            db,
            evaluator: Box::new(PayloadEvaluator),
        }
    }

    /// Replace the evaluator used by executions.
    #[must_use]
    pub fn with_evaluator(mut self, evaluator: impl SituationEvaluator + 'static) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &AttestDb {
        &self.db
    }

    /// Access the situation evaluator.
    #[must_use]
    pub fn evaluator(&self) -> &dyn SituationEvaluator {
        self.evaluator.as_ref()
    }
}
