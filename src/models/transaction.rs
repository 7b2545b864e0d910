//! Transaction model
//!
//! Represents an income or expense recorded by a user, plus the input shapes
//! used to create and edit one.

use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::ids::{TransactionId, UserId};
use super::money::Money;

/// Stored timestamp format (whole seconds, sorts lexically)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a timestamp for storage
pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp, tolerating fractional seconds
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
}

/// Whether money came in or went out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transaction type '{0}': expected Income or Expense")]
pub struct KindParseError(pub String);

impl TransactionKind {
    /// Value stored in the `type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = KindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" | "i" => Ok(Self::Income),
            "expense" | "e" => Ok(Self::Expense),
            _ => Err(KindParseError(s.trim().to_string())),
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// A recorded transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: TransactionId,

    /// Owning user
    pub user_id: UserId,

    pub kind: TransactionKind,

    /// Always positive; the kind carries the direction
    pub amount: Money,

    pub category: String,

    pub description: Option<String>,

    /// Creation instant (local time)
    pub date: NaiveDateTime,
}

/// Validation failures for transaction input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionValidationError {
    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    #[error("amount cannot exceed {}", Money::MAX)]
    AmountTooLarge,

    #[error("category cannot be empty")]
    EmptyCategory,
}

/// Input for recording a new transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: Money,
    pub category: String,
    pub description: Option<String>,
}

impl NewTransaction {
    pub fn new(kind: TransactionKind, amount: Money, category: impl Into<String>) -> Self {
        Self {
            kind,
            amount,
            category: category.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Trim text fields, drop an empty description, and check invariants
    pub fn normalized(self) -> Result<Self, TransactionValidationError> {
        let category = validate_category(&self.category)?;
        validate_amount(self.amount)?;

        Ok(Self {
            kind: self.kind,
            amount: self.amount,
            category,
            description: normalize_description(self.description),
        })
    }
}

/// Partial edit of a transaction; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub amount: Option<Money>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl TransactionUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.category.is_none() && self.description.is_none()
    }

    /// Apply the present fields to a transaction
    pub fn apply_to(&self, txn: &mut Transaction) -> Result<(), TransactionValidationError> {
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
            txn.amount = amount;
        }
        if let Some(category) = &self.category {
            txn.category = validate_category(category)?;
        }
        if let Some(description) = &self.description {
            txn.description = normalize_description(Some(description.clone()));
        }
        Ok(())
    }
}

fn validate_amount(amount: Money) -> Result<(), TransactionValidationError> {
    if !amount.is_positive() {
        Err(TransactionValidationError::NonPositiveAmount)
    } else if amount > Money::MAX {
        Err(TransactionValidationError::AmountTooLarge)
    } else {
        Ok(())
    }
}

fn validate_category(category: &str) -> Result<String, TransactionValidationError> {
    let category = category.trim();
    if category.is_empty() {
        Err(TransactionValidationError::EmptyCategory)
    } else {
        Ok(category.to_string())
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Transaction {
        Transaction {
            id: TransactionId::new(1),
            user_id: UserId::new(1),
            kind: TransactionKind::Expense,
            amount: Money::from_units(50),
            category: "Food".into(),
            description: Some("lunch".into()),
            date: NaiveDate::from_ymd_opt(2024, 6, 15)
                .unwrap()
                .and_hms_opt(12, 30, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_kind_parse_is_case_insensitive() {
        assert_eq!("income".parse::<TransactionKind>().unwrap(), TransactionKind::Income);
        assert_eq!(" EXPENSE ".parse::<TransactionKind>().unwrap(), TransactionKind::Expense);
        assert!("transfer".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn test_kind_display_matches_column_value() {
        assert_eq!(TransactionKind::Income.to_string(), "Income");
        assert_eq!(TransactionKind::Expense.as_str(), "Expense");
    }

    #[test]
    fn test_timestamp_format_roundtrip() {
        let txn = sample();
        let stored = format_timestamp(txn.date);
        assert_eq!(stored, "2024-06-15 12:30:00");
        assert_eq!(parse_timestamp(&stored).unwrap(), txn.date);
        assert_eq!(
            parse_timestamp("2024-06-15 12:30:00.250").unwrap().date(),
            txn.date.date()
        );
    }

    #[test]
    fn test_new_transaction_normalized() {
        let input = NewTransaction::new(TransactionKind::Expense, Money::from_units(5), "  Food ")
            .with_description("   ");
        let normalized = input.normalized().unwrap();
        assert_eq!(normalized.category, "Food");
        assert_eq!(normalized.description, None);
    }

    #[test]
    fn test_new_transaction_rejects_bad_input() {
        let zero = NewTransaction::new(TransactionKind::Income, Money::zero(), "Salary");
        assert_eq!(
            zero.normalized().unwrap_err(),
            TransactionValidationError::NonPositiveAmount
        );

        let blank = NewTransaction::new(TransactionKind::Income, Money::from_units(1), " ");
        assert_eq!(
            blank.normalized().unwrap_err(),
            TransactionValidationError::EmptyCategory
        );
    }

    #[test]
    fn test_amount_capped() {
        let at_cap = NewTransaction::new(TransactionKind::Income, Money::MAX, "Salary");
        assert!(at_cap.normalized().is_ok());

        let huge = Money::from_cents(9_000_000_000_000_000_000);
        let over = NewTransaction::new(TransactionKind::Income, huge, "Salary");
        assert_eq!(
            over.normalized().unwrap_err(),
            TransactionValidationError::AmountTooLarge
        );

        let mut txn = sample();
        let err = TransactionUpdate::new().amount(huge).apply_to(&mut txn).unwrap_err();
        assert_eq!(err, TransactionValidationError::AmountTooLarge);
        assert_eq!(txn.amount, Money::from_units(50));
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let mut txn = sample();
        let update = TransactionUpdate::new().amount(Money::from_units(75));
        update.apply_to(&mut txn).unwrap();

        assert_eq!(txn.amount, Money::from_units(75));
        assert_eq!(txn.category, "Food");
        assert_eq!(txn.description.as_deref(), Some("lunch"));
    }

    #[test]
    fn test_update_validation() {
        let mut txn = sample();
        let update = TransactionUpdate::new().amount(Money::from_cents(-1));
        assert!(update.apply_to(&mut txn).is_err());
        assert!(TransactionUpdate::new().is_empty());
    }
}
