//! Repository modules implementing operations for all Attest entities.
//!
//! Each module adds methods to `AttestService` via `impl AttestService` blocks.

pub mod acceptance_test;
pub mod audit;
pub mod execution;
pub mod query;
pub mod situation;
pub mod user;
