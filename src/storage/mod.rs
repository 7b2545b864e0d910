//! Storage layer for fintrack
//!
//! One SQLite connection per process, shared by the repositories. Mutations
//! are also recorded in the audit log when one is attached.

pub mod budgets;
pub mod schema;
pub mod transactions;
pub mod users;

pub use budgets::BudgetRepository;
pub use schema::{setup_database, SCHEMA_VERSION};
pub use transactions::{KindTotals, TransactionRepository};
pub use users::UserRepository;

use std::path::PathBuf;

use rusqlite::Connection;
use serde::Serialize;
use tracing::{debug, warn};

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::FinTrackPaths;
use crate::error::{FinanceError, FinanceResult};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    conn: Connection,
    audit: Option<AuditLogger>,
}

impl Storage {
    /// Open the database under the data directory, creating it if needed
    pub fn open(paths: &FinTrackPaths) -> FinanceResult<Self> {
        paths.ensure_directories()?;

        let db_path = paths.database_file();
        let conn = Connection::open(&db_path).map_err(|e| {
            FinanceError::Storage(format!("Failed to open {}: {}", db_path.display(), e))
        })?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        debug!(path = %db_path.display(), "opened database");

        Self::from_connection(conn).map(|storage| storage.with_audit_log(paths.audit_log()))
    }

    /// Private in-memory database, without audit logging
    pub fn open_in_memory() -> FinanceResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> FinanceResult<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        setup_database(&conn)?;
        Ok(Self { conn, audit: None })
    }

    /// Record mutations to an audit log at `path`
    pub fn with_audit_log(mut self, path: PathBuf) -> Self {
        self.audit = Some(AuditLogger::new(path));
        self
    }

    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.conn)
    }

    pub fn transactions(&self) -> TransactionRepository<'_> {
        TransactionRepository::new(&self.conn)
    }

    pub fn budgets(&self) -> BudgetRepository<'_> {
        BudgetRepository::new(&self.conn)
    }

    /// Run `f` inside one SQLite transaction
    ///
    /// Commits when `f` returns `Ok`; any error rolls every write back.
    pub fn atomic<T>(&self, f: impl FnOnce() -> FinanceResult<T>) -> FinanceResult<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f()?;
        tx.commit()?;
        Ok(value)
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        actor: Option<String>,
        entity: &T,
    ) {
        self.write_audit(AuditEntry::create(entity_type, entity_id, entity), actor)
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        actor: Option<String>,
        before: &T,
        after: &T,
    ) {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        self.write_audit(
            AuditEntry::update(entity_type, entity_id, before, after, diff),
            actor,
        )
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        actor: Option<String>,
        entity: &T,
    ) {
        self.write_audit(AuditEntry::delete(entity_type, entity_id, entity), actor)
    }

    /// Append to the audit log after a committed write
    ///
    /// The row is already stored, so a failed append is reported and the
    /// caller carries on.
    fn write_audit(&self, entry: AuditEntry, actor: Option<String>) {
        let Some(logger) = &self.audit else {
            return;
        };
        let entry = match actor {
            Some(actor) => entry.by(actor),
            None => entry,
        };
        if let Err(e) = logger.log(&entry) {
            warn!(
                path = %logger.path().display(),
                operation = %entry.operation,
                entity_id = %entry.entity_id,
                error = %e,
                "failed to write audit entry"
            );
        }
    }
}
