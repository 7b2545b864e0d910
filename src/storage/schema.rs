//! Database schema and migrations

use rusqlite::Connection;
use tracing::debug;

use crate::error::FinanceResult;

/// Value written to `PRAGMA user_version` once the schema is current
pub const SCHEMA_VERSION: i64 = 1;

const CREATE_TABLES: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        username        TEXT NOT NULL UNIQUE,
        hashed_password TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transactions (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id     INTEGER NOT NULL REFERENCES users(id),
        type        TEXT NOT NULL CHECK (type IN ('Income', 'Expense')),
        amount      INTEGER NOT NULL,
        category    TEXT NOT NULL,
        description TEXT,
        date        TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS budgets (
        id       INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id  INTEGER NOT NULL REFERENCES users(id),
        category TEXT NOT NULL,
        amount   INTEGER NOT NULL,
        month    INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
        year     INTEGER NOT NULL
    );
";

// Older databases may hold several rows per budget key; the newest wins.
const COLLAPSE_DUPLICATE_BUDGETS: &str = "
    DELETE FROM budgets
    WHERE id NOT IN (
        SELECT MAX(id) FROM budgets GROUP BY user_id, category, month, year
    );
";

const CREATE_INDEXES: &str = "
    CREATE UNIQUE INDEX IF NOT EXISTS idx_budgets_unique
        ON budgets(user_id, category, month, year);

    CREATE INDEX IF NOT EXISTS idx_transactions_user_date
        ON transactions(user_id, date);
";

/// Create tables and indexes; safe to run on every open
pub fn setup_database(conn: &Connection) -> FinanceResult<()> {
    let version = schema_version(conn)?;
    debug!(version, expected = SCHEMA_VERSION, "checking database schema");

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(CREATE_TABLES)?;

    if version < SCHEMA_VERSION {
        let removed = tx.execute(COLLAPSE_DUPLICATE_BUDGETS, [])?;
        if removed > 0 {
            debug!(removed, "collapsed duplicate budget rows");
        }
    }

    tx.execute_batch(CREATE_INDEXES)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;

    Ok(())
}

/// Current `PRAGMA user_version`
pub fn schema_version(conn: &Connection) -> FinanceResult<i64> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        let names = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap();
        names
    }

    #[test]
    fn test_setup_creates_tables() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        let names = table_names(&conn);
        for table in ["budgets", "transactions", "users"] {
            assert!(names.iter().any(|n| n == table), "missing {}", table);
        }
        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_setup_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn.execute(
            "INSERT INTO users (username, hashed_password) VALUES ('alice', 'x')",
            [],
        )
        .unwrap();

        setup_database(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_legacy_duplicate_budgets_collapsed() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(CREATE_TABLES).unwrap();
        conn.execute_batch(
            "INSERT INTO users (username, hashed_password) VALUES ('alice', 'x');
             INSERT INTO budgets (user_id, category, amount, month, year) VALUES (1, 'Food', 10000, 6, 2024);
             INSERT INTO budgets (user_id, category, amount, month, year) VALUES (1, 'Food', 25000, 6, 2024);
             INSERT INTO budgets (user_id, category, amount, month, year) VALUES (1, 'Rent', 90000, 6, 2024);",
        )
        .unwrap();

        setup_database(&conn).unwrap();

        let food: Vec<i64> = conn
            .prepare("SELECT amount FROM budgets WHERE category = 'Food'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(food, vec![25000]);

        let dup = conn.execute(
            "INSERT INTO budgets (user_id, category, amount, month, year) VALUES (1, 'Rent', 1, 6, 2024)",
            [],
        );
        assert!(dup.is_err());
    }

    #[test]
    fn test_transaction_type_checked() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn.execute(
            "INSERT INTO users (username, hashed_password) VALUES ('alice', 'x')",
            [],
        )
        .unwrap();

        let bad = conn.execute(
            "INSERT INTO transactions (user_id, type, amount, category, date)
             VALUES (1, 'Transfer', 100, 'Misc', '2024-06-01 00:00:00')",
            [],
        );
        assert!(bad.is_err());
    }
}
