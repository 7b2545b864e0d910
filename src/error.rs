//! Custom error types for fintrack
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for fintrack operations
#[derive(Error, Debug)]
pub enum FinanceError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Database errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Malformed or out-of-range user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Username is already registered
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    /// Unknown username or wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Entity is missing or owned by another user
    #[error("{entity_type} {id} not found or you don't have permission to access it")]
    NotFoundOrForbidden {
        entity_type: &'static str,
        id: String,
    },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Password hashing errors
    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

impl FinanceError {
    /// Create a "not found or forbidden" error for transactions
    pub fn transaction_not_owned(id: impl ToString) -> Self {
        Self::NotFoundOrForbidden {
            entity_type: "Transaction",
            id: id.to_string(),
        }
    }

    /// Create a "not found" error for users
    pub fn user_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "User",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NotFoundOrForbidden { .. })
    }

    /// Check if this is an input validation error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Storage and I/O failures end the session; everything else is reported
    /// and the user returns to the menu.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Io(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for FinanceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FinanceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<rusqlite::Error> for FinanceError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

// Model validation failures are all reported to the user as invalid input

macro_rules! invalid_input_from {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for FinanceError {
                fn from(err: $source) -> Self {
                    Self::InvalidInput(err.to_string())
                }
            }
        )*
    };
}

invalid_input_from!(
    crate::models::MoneyParseError,
    crate::models::PeriodError,
    crate::models::KindParseError,
    crate::models::TransactionValidationError,
    crate::models::BudgetValidationError,
);

/// Result type alias for fintrack operations
pub type FinanceResult<T> = Result<T, FinanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FinanceError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_owned_error() {
        let err = FinanceError::transaction_not_owned(42);
        assert_eq!(
            err.to_string(),
            "Transaction 42 not found or you don't have permission to access it"
        );
        assert!(err.is_not_found());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_duplicate_username_error() {
        let err = FinanceError::DuplicateUsername("alice".into());
        assert_eq!(err.to_string(), "Username already exists: alice");
    }

    #[test]
    fn test_from_io_error_is_fatal() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FinanceError = io_err.into();
        assert!(matches!(err, FinanceError::Io(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_validation_errors_are_invalid_input() {
        let err: FinanceError = crate::models::PeriodError::InvalidMonth(13).into();
        assert!(err.is_invalid_input());
        assert_eq!(err.to_string(), "Invalid input: month must be between 1 and 12, got 13");
    }

    #[test]
    fn test_from_sqlite_error() {
        let err: FinanceError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, FinanceError::Storage(_)));
        assert!(err.is_fatal());
    }
}
