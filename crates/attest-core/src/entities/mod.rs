//! Entity structs for all Attest domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `attest-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON roundtrip and schema validation.

mod audit;
mod execution;
mod situation;
mod user;

pub use acceptance_test::{AcceptanceTest, ExpectedResult, PopulatedAcceptanceTest};
pub use audit::AuditEntry;
pub use execution::AcceptanceTestExecution;
pub use situation::Situation;
pub use user::User;
