//! Budget repository

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::FinanceResult;
use crate::models::{Budget, BudgetId, Money, UserId};

const SELECT_COLUMNS: &str = "SELECT id, user_id, category, amount, month, year FROM budgets";

/// Reads and writes the `budgets` table
pub struct BudgetRepository<'c> {
    conn: &'c Connection,
}

impl<'c> BudgetRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Budget row for one (user, category, month, year) key
    pub fn find(
        &self,
        user_id: UserId,
        category: &str,
        month: u32,
        year: i32,
    ) -> FinanceResult<Option<Budget>> {
        let sql = format!(
            "{} WHERE user_id = ?1 AND category = ?2 AND month = ?3 AND year = ?4",
            SELECT_COLUMNS
        );
        Ok(self
            .conn
            .query_row(&sql, params![user_id, category, month, year], row_to_budget)
            .optional()?)
    }

    pub fn insert(
        &self,
        user_id: UserId,
        category: &str,
        amount: Money,
        month: u32,
        year: i32,
    ) -> FinanceResult<Budget> {
        self.conn.execute(
            "INSERT INTO budgets (user_id, category, amount, month, year)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![user_id, category, amount, month, year],
        )?;

        Ok(Budget {
            id: BudgetId::new(self.conn.last_insert_rowid()),
            user_id,
            category: category.to_string(),
            amount,
            month,
            year,
        })
    }

    pub fn update_amount(&self, id: BudgetId, amount: Money) -> FinanceResult<bool> {
        let changed = self.conn.execute(
            "UPDATE budgets SET amount = ?1 WHERE id = ?2",
            params![amount, id],
        )?;
        Ok(changed > 0)
    }

    /// A user's budgets for one month, ordered by category
    pub fn list(&self, user_id: UserId, month: u32, year: i32) -> FinanceResult<Vec<Budget>> {
        let sql = format!(
            "{} WHERE user_id = ?1 AND month = ?2 AND year = ?3 ORDER BY category",
            SELECT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let budgets = stmt
            .query_map(params![user_id, month, year], row_to_budget)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(budgets)
    }
}

fn row_to_budget(row: &Row<'_>) -> rusqlite::Result<Budget> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category: row.get(2)?,
        amount: row.get(3)?,
        month: row.get(4)?,
        year: row.get(5)?,
    })
}
