//! Service layer for fintrack
//!
//! Business rules on top of the storage layer: validation, ownership
//! checks, budget warnings and audit logging.

pub mod auth;
pub mod budget;
pub mod ledger;
pub mod report;

pub use auth::AuthService;
pub use budget::BudgetService;
pub use ledger::{AddedTransaction, LedgerService};
pub use report::{PeriodReport, ReportService};

use crate::error::{FinanceError, FinanceResult};
use crate::models::UserId;
use crate::storage::Storage;

/// Fail with `NotFound` unless the user row exists
pub(crate) fn ensure_user(storage: &Storage, user_id: UserId) -> FinanceResult<()> {
    if storage.users().exists(user_id)? {
        Ok(())
    } else {
        Err(FinanceError::user_not_found(user_id.tagged()))
    }
}
