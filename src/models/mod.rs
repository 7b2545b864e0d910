//! Core data models for fintrack
//!
//! This module contains the data structures that represent the domain:
//! users, transactions, budgets, money and reporting periods.

pub mod budget;
pub mod ids;
pub mod money;
pub mod period;
pub mod transaction;
pub mod user;

pub use budget::{
    validate_budget, Budget, BudgetChange, BudgetValidationError, BudgetWarning,
    CategoryBudgetStatus,
};
pub use ids::{BudgetId, TransactionId, UserId};
pub use money::{Money, MoneyParseError};
pub use period::{validate_month, validate_year, PeriodError, ReportPeriod};
pub use transaction::{
    KindParseError, NewTransaction, Transaction, TransactionKind, TransactionUpdate,
    TransactionValidationError,
};
pub use user::{normalize_username, User};
