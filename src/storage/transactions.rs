//! Transaction repository

use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{FinanceError, FinanceResult};
use crate::models::transaction::{format_timestamp, parse_timestamp};
use crate::models::{
    Money, NewTransaction, ReportPeriod, Transaction, TransactionId, TransactionKind, UserId,
};

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, type, amount, category, description, date FROM transactions";

/// Reads and writes the `transactions` table
///
/// Every lookup that can touch an existing row is scoped by owner, so a
/// foreign id behaves exactly like a missing one.
pub struct TransactionRepository<'c> {
    conn: &'c Connection,
}

/// Income and expense sums for a period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindTotals {
    pub income: Money,
    pub expenses: Money,
}

impl<'c> TransactionRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Insert a validated transaction stamped with `date`
    pub fn insert(
        &self,
        user_id: UserId,
        input: &NewTransaction,
        date: NaiveDateTime,
    ) -> FinanceResult<Transaction> {
        let date_text = format_timestamp(date);
        self.conn.execute(
            "INSERT INTO transactions (user_id, type, amount, category, description, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user_id,
                input.kind,
                input.amount,
                input.category,
                input.description,
                date_text
            ],
        )?;

        Ok(Transaction {
            id: TransactionId::new(self.conn.last_insert_rowid()),
            user_id,
            kind: input.kind,
            amount: input.amount,
            category: input.category.clone(),
            description: input.description.clone(),
            // Round-trip through the stored form so callers see what a read returns
            date: parse_timestamp(&date_text).unwrap_or(date),
        })
    }

    /// Fetch a transaction only if `user_id` owns it
    pub fn get_owned(
        &self,
        id: TransactionId,
        user_id: UserId,
    ) -> FinanceResult<Option<Transaction>> {
        let sql = format!("{} WHERE id = ?1 AND user_id = ?2", SELECT_COLUMNS);
        Ok(self
            .conn
            .query_row(&sql, params![id, user_id], row_to_transaction)
            .optional()?)
    }

    /// Persist the mutable fields of an owned transaction
    pub fn update(&self, txn: &Transaction) -> FinanceResult<bool> {
        let changed = self.conn.execute(
            "UPDATE transactions SET amount = ?1, category = ?2, description = ?3
             WHERE id = ?4 AND user_id = ?5",
            params![txn.amount, txn.category, txn.description, txn.id, txn.user_id],
        )?;
        Ok(changed > 0)
    }

    pub fn delete(&self, id: TransactionId, user_id: UserId) -> FinanceResult<bool> {
        let removed = self.conn.execute(
            "DELETE FROM transactions WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(removed > 0)
    }

    /// All of a user's transactions, newest first
    pub fn list_for_user(&self, user_id: UserId) -> FinanceResult<Vec<Transaction>> {
        let sql = format!(
            "{} WHERE user_id = ?1 ORDER BY date DESC, id DESC",
            SELECT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([user_id], row_to_transaction)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Income and expense totals within a period
    pub fn totals_by_kind(
        &self,
        user_id: UserId,
        period: &ReportPeriod,
    ) -> FinanceResult<KindTotals> {
        let (start, end) = period.timestamp_bounds();
        let mut stmt = self.conn.prepare(
            "SELECT type, SUM(amount) FROM transactions
             WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3
             GROUP BY type",
        )?;

        let rows = stmt
            .query_map(params![user_id, start, end], |row| {
                Ok((row.get::<_, TransactionKind>(0)?, row.get::<_, Money>(1)?))
            })
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| sum_error(e, period))?;

        let mut totals = KindTotals::default();
        for row in rows {
            match row {
                (TransactionKind::Income, sum) => totals.income = sum,
                (TransactionKind::Expense, sum) => totals.expenses = sum,
            }
        }

        Ok(totals)
    }

    /// Expense total for one category within a period
    pub fn sum_expenses_in_category(
        &self,
        user_id: UserId,
        category: &str,
        period: &ReportPeriod,
    ) -> FinanceResult<Money> {
        let (start, end) = period.timestamp_bounds();
        self.conn
            .query_row(
                "SELECT COALESCE(SUM(amount), 0) FROM transactions
                 WHERE user_id = ?1 AND type = ?2 AND category = ?3 AND date BETWEEN ?4 AND ?5",
                params![user_id, TransactionKind::Expense, category, start, end],
                |row| row.get(0),
            )
            .map_err(|e| sum_error(e, period))
    }

    #[cfg(test)]
    pub fn count_for_user(&self, user_id: UserId) -> FinanceResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE user_id = ?1",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

/// SQLite refuses to SUM past `i64`; rows stored before amounts were capped
/// can hit that, and it should not end the session.
fn sum_error(e: rusqlite::Error, period: &ReportPeriod) -> FinanceError {
    match &e {
        rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("integer overflow") => {
            FinanceError::InvalidInput(format!("totals for {} are too large to add up", period))
        }
        _ => e.into(),
    }
}

fn row_to_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let date: String = row.get(6)?;
    let date = parse_timestamp(&date)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        description: row.get(5)?,
        date,
    })
}
