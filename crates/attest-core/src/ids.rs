//! ID prefixes for every stored entity.
//!
//! IDs have the shape `{prefix}-{8 hex chars}`, e.g. `act-a3f8b2c1`. The random
//! part is produced by the database (see `AttestDb::generate_id`).

pub const PREFIX_USER: &str = "usr";
pub const PREFIX_SITUATION: &str = "sit";
pub const PREFIX_ACCEPTANCE_TEST: &str = "act";
pub const PREFIX_EXECUTION: &str = "exe";
pub const PREFIX_AUDIT: &str = "aud";

/// All prefixes, in entity declaration order.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_USER,
    PREFIX_SITUATION,
    PREFIX_ACCEPTANCE_TEST,
    PREFIX_EXECUTION,
    PREFIX_AUDIT,
];
