//! # attest-core
//!
//! Core types for Attest, the acceptance test service.
//!
//! This crate provides the foundational types shared across all Attest crates:
//! - Entity structs for users, situations, acceptance tests, executions and audit entries
//! - State enums with transition tables
//! - ID prefix constants
//! - Caller identity as resolved by the HTTP boundary
//! - Response views selected by caller capability
//! - Audit detail sub-types
//! - Cross-cutting error types

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod responses;
