//! Ledger service
//!
//! Records, edits and removes a user's transactions. Adding an expense
//! checks the category's budget for the month and reports an overrun
//! without blocking the insert.

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use crate::audit::EntityType;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{
    BudgetWarning, NewTransaction, ReportPeriod, Transaction, TransactionId, TransactionKind,
    TransactionUpdate, UserId,
};
use crate::storage::Storage;

use super::ensure_user;

/// Service for transaction management
pub struct LedgerService<'a> {
    storage: &'a Storage,
}

/// A recorded transaction and any budget overrun it caused
#[derive(Debug, Clone)]
pub struct AddedTransaction {
    pub transaction: Transaction,
    pub budget_warning: Option<BudgetWarning>,
}

impl<'a> LedgerService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a transaction stamped with the current local time
    pub fn add(&self, user_id: UserId, input: NewTransaction) -> FinanceResult<AddedTransaction> {
        self.add_at(user_id, input, Local::now().naive_local())
    }

    /// Record a transaction with an explicit timestamp
    ///
    /// The budget lookup and the insert share one database transaction, so
    /// the warning reflects exactly the rows the insert lands next to.
    pub fn add_at(
        &self,
        user_id: UserId,
        input: NewTransaction,
        date: NaiveDateTime,
    ) -> FinanceResult<AddedTransaction> {
        let input = input.normalized()?;
        ensure_user(self.storage, user_id)?;

        let added = self.storage.atomic(|| {
            let budget_warning = match input.kind {
                TransactionKind::Expense => self.check_budget(user_id, &input, date)?,
                TransactionKind::Income => None,
            };
            let transaction = self.storage.transactions().insert(user_id, &input, date)?;
            Ok(AddedTransaction {
                transaction,
                budget_warning,
            })
        })?;

        let txn = &added.transaction;
        self.storage.log_create(
            EntityType::Transaction,
            txn.id.tagged(),
            Some(user_id.tagged()),
            txn,
        );
        info!(
            user_id = %user_id,
            transaction_id = %txn.id,
            kind = %txn.kind,
            amount = %txn.amount,
            "recorded transaction"
        );
        if let Some(warning) = &added.budget_warning {
            warn!(
                user_id = %user_id,
                category = %warning.category,
                budget = %warning.budget,
                spent = %warning.spent,
                "expense exceeds monthly budget"
            );
        }

        Ok(added)
    }

    /// Overrun warning for an expense about to be inserted, if any
    fn check_budget(
        &self,
        user_id: UserId,
        input: &NewTransaction,
        date: NaiveDateTime,
    ) -> FinanceResult<Option<BudgetWarning>> {
        let period = ReportPeriod::month_of(date);
        let ReportPeriod::Month { year, month } = period else {
            return Ok(None);
        };

        let Some(budget) = self
            .storage
            .budgets()
            .find(user_id, &input.category, month, year)?
        else {
            return Ok(None);
        };

        let spent = self
            .storage
            .transactions()
            .sum_expenses_in_category(user_id, &input.category, &period)?
            .checked_add(input.amount)
            .ok_or_else(|| {
                FinanceError::InvalidInput(format!(
                    "spending in {} for {} is too large to total",
                    input.category, period
                ))
            })?;

        Ok((spent > budget.amount).then(|| BudgetWarning {
            category: input.category.clone(),
            period,
            budget: budget.amount,
            spent,
        }))
    }

    /// Overwrite the present fields of an owned transaction
    pub fn update(
        &self,
        trans_id: TransactionId,
        user_id: UserId,
        update: TransactionUpdate,
    ) -> FinanceResult<Transaction> {
        let before = self.get_owned(trans_id, user_id)?;
        if update.is_empty() {
            return Ok(before);
        }

        let mut after = before.clone();
        update.apply_to(&mut after)?;

        if !self.storage.transactions().update(&after)? {
            return Err(FinanceError::transaction_not_owned(trans_id));
        }

        self.storage.log_update(
            EntityType::Transaction,
            trans_id.tagged(),
            Some(user_id.tagged()),
            &before,
            &after,
        );
        info!(user_id = %user_id, transaction_id = %trans_id, "updated transaction");

        Ok(after)
    }

    /// Permanently remove an owned transaction, returning what was removed
    pub fn delete(&self, trans_id: TransactionId, user_id: UserId) -> FinanceResult<Transaction> {
        let txn = self.get_owned(trans_id, user_id)?;

        if !self.storage.transactions().delete(trans_id, user_id)? {
            return Err(FinanceError::transaction_not_owned(trans_id));
        }

        self.storage.log_delete(
            EntityType::Transaction,
            trans_id.tagged(),
            Some(user_id.tagged()),
            &txn,
        );
        info!(user_id = %user_id, transaction_id = %trans_id, "deleted transaction");

        Ok(txn)
    }

    /// All of a user's transactions, newest first
    pub fn list(&self, user_id: UserId) -> FinanceResult<Vec<Transaction>> {
        self.storage.transactions().list_for_user(user_id)
    }

    pub fn get_owned(
        &self,
        trans_id: TransactionId,
        user_id: UserId,
    ) -> FinanceResult<Transaction> {
        self.storage
            .transactions()
            .get_owned(trans_id, user_id)?
            .ok_or_else(|| FinanceError::transaction_not_owned(trans_id))
    }
}
