//! Budget model
//!
//! A budget is a spending ceiling for one category in one calendar month.

use serde::Serialize;
use thiserror::Error;

use super::ids::{BudgetId, UserId};
use super::money::Money;
use super::period::ReportPeriod;

/// A monthly spending ceiling for a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Budget {
    pub id: BudgetId,
    pub user_id: UserId,
    pub category: String,
    pub amount: Money,
    pub month: u32,
    pub year: i32,
}

impl Budget {
    /// The month this budget applies to
    pub fn period(&self) -> ReportPeriod {
        ReportPeriod::Month {
            year: self.year,
            month: self.month,
        }
    }
}

/// Validation failures for budget input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetValidationError {
    #[error("budget amount cannot be negative")]
    NegativeAmount,

    #[error("budget amount cannot exceed {}", Money::MAX)]
    AmountTooLarge,

    #[error("budget category cannot be empty")]
    EmptyCategory,
}

/// Check a budget ceiling and return the trimmed category
pub fn validate_budget(category: &str, amount: Money) -> Result<String, BudgetValidationError> {
    if amount.is_negative() {
        return Err(BudgetValidationError::NegativeAmount);
    }
    if amount > Money::MAX {
        return Err(BudgetValidationError::AmountTooLarge);
    }
    let category = category.trim();
    if category.is_empty() {
        return Err(BudgetValidationError::EmptyCategory);
    }
    Ok(category.to_string())
}

/// Whether `set_budget` inserted a row or overwrote one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetChange {
    Created,
    Updated,
}

/// Advisory emitted when an expense pushes a category over its ceiling
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetWarning {
    pub category: String,
    pub period: ReportPeriod,
    /// The ceiling configured for the month
    pub budget: Money,
    /// Expense total for the month including the new transaction
    pub spent: Money,
}

impl BudgetWarning {
    /// How far the month's spending is over the ceiling
    pub fn overage(&self) -> Money {
        self.spent - self.budget
    }
}

/// Budget versus actual spending for one category in one month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBudgetStatus {
    pub category: String,
    pub budgeted: Money,
    pub spent: Money,
}

impl CategoryBudgetStatus {
    pub fn remaining(&self) -> Money {
        self.budgeted - self.spent
    }

    pub fn is_over_budget(&self) -> bool {
        self.spent > self.budgeted
    }
}
