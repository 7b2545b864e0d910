//! User repository

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{FinanceError, FinanceResult};
use crate::models::{User, UserId};

/// Reads and writes the `users` table
pub struct UserRepository<'c> {
    conn: &'c Connection,
}

impl<'c> UserRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Insert a user; a taken username maps to `DuplicateUsername`
    pub fn insert(&self, username: &str, password_hash: &str) -> FinanceResult<User> {
        let result = self.conn.execute(
            "INSERT INTO users (username, hashed_password) VALUES (?1, ?2)",
            params![username, password_hash],
        );

        match result {
            Ok(_) => Ok(User {
                id: UserId::new(self.conn.last_insert_rowid()),
                username: username.to_string(),
                password_hash: password_hash.to_string(),
            }),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(FinanceError::DuplicateUsername(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn find_by_username(&self, username: &str) -> FinanceResult<Option<User>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, username, hashed_password FROM users WHERE username = ?1",
                [username],
                row_to_user,
            )
            .optional()?)
    }

    pub fn get(&self, id: UserId) -> FinanceResult<Option<User>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, username, hashed_password FROM users WHERE id = ?1",
                [id],
                row_to_user,
            )
            .optional()?)
    }

    pub fn exists(&self, id: UserId) -> FinanceResult<bool> {
        Ok(self
            .conn
            .query_row("SELECT 1 FROM users WHERE id = ?1", [id], |_| Ok(()))
            .optional()?
            .is_some())
    }

    #[cfg(test)]
    pub fn count(&self) -> FinanceResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema::setup_database;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn
    }

    #[test]
    fn test_insert_and_find() {
        let conn = setup();
        let repo = UserRepository::new(&conn);

        let user = repo.insert("alice", "hash-a").unwrap();
        let found = repo.find_by_username("alice").unwrap().unwrap();

        assert_eq!(found.id, user.id);
        assert_eq!(found.password_hash, "hash-a");
        assert!(repo.exists(user.id).unwrap());
        assert_eq!(repo.get(user.id).unwrap().unwrap().username, "alice");
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let conn = setup();
        let repo = UserRepository::new(&conn);

        repo.insert("alice", "first").unwrap();
        let err = repo.insert("alice", "second").unwrap_err();

        assert!(matches!(err, FinanceError::DuplicateUsername(ref name) if name == "alice"));
        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(
            repo.find_by_username("alice").unwrap().unwrap().password_hash,
            "first"
        );
    }

    #[test]
    fn test_missing_user() {
        let conn = setup();
        let repo = UserRepository::new(&conn);

        assert!(repo.find_by_username("nobody").unwrap().is_none());
        assert!(!repo.exists(UserId::new(99)).unwrap());
    }
}
