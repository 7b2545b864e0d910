//! Append-only audit log
//!
//! Every create, update and delete of a user, transaction or budget is
//! written as one JSON line with before/after snapshots. The log is separate
//! from the `tracing` diagnostics and is what the `audit` command reads.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
