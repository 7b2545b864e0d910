//! Budget service
//!
//! Monthly per-category spending ceilings and their status against actual
//! expenses.

use tracing::info;

use crate::audit::EntityType;
use crate::error::FinanceResult;
use crate::models::{
    validate_budget, validate_month, validate_year, Budget, BudgetChange, CategoryBudgetStatus,
    Money, ReportPeriod, UserId,
};
use crate::storage::Storage;

use super::ensure_user;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Set the ceiling for a category in a month, replacing any existing one
    pub fn set(
        &self,
        user_id: UserId,
        category: &str,
        amount: Money,
        month: u32,
        year: i32,
    ) -> FinanceResult<(Budget, BudgetChange)> {
        let month = validate_month(month)?;
        let year = validate_year(year)?;
        let category = validate_budget(category, amount)?;
        ensure_user(self.storage, user_id)?;

        let (before, budget, change) = self.storage.atomic(|| {
            let budgets = self.storage.budgets();
            match budgets.find(user_id, &category, month, year)? {
                Some(existing) => {
                    budgets.update_amount(existing.id, amount)?;
                    let updated = Budget {
                        amount,
                        ..existing.clone()
                    };
                    Ok((Some(existing), updated, BudgetChange::Updated))
                }
                None => {
                    let created = budgets.insert(user_id, &category, amount, month, year)?;
                    Ok((None, created, BudgetChange::Created))
                }
            }
        })?;

        let actor = Some(user_id.tagged());
        match &before {
            Some(before) => self.storage.log_update(
                EntityType::Budget,
                budget.id.tagged(),
                actor,
                before,
                &budget,
            ),
            None => {
                self.storage
                    .log_create(EntityType::Budget, budget.id.tagged(), actor, &budget)
            }
        }
        info!(
            user_id = %user_id,
            category = %budget.category,
            period = %budget.period(),
            amount = %budget.amount,
            ?change,
            "set budget"
        );

        Ok((budget, change))
    }

    /// A user's budgets for one month, ordered by category
    pub fn list(&self, user_id: UserId, month: u32, year: i32) -> FinanceResult<Vec<Budget>> {
        let month = validate_month(month)?;
        let year = validate_year(year)?;
        self.storage.budgets().list(user_id, month, year)
    }

    /// Budget versus spending for every budgeted category of a month
    pub fn status(
        &self,
        user_id: UserId,
        month: u32,
        year: i32,
    ) -> FinanceResult<Vec<CategoryBudgetStatus>> {
        let period = ReportPeriod::month(year, month)?;
        let transactions = self.storage.transactions();

        self.list(user_id, month, year)?
            .into_iter()
            .map(|budget| -> FinanceResult<CategoryBudgetStatus> {
                let spent =
                    transactions.sum_expenses_in_category(user_id, &budget.category, &period)?;
                Ok(CategoryBudgetStatus {
                    category: budget.category,
                    budgeted: budget.amount,
                    spent,
                })
            })
            .collect()
    }
}
