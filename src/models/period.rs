//! Reporting period representation
//!
//! Budgets are keyed by calendar month; reports cover either one month or a
//! whole calendar year.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Smallest year accepted anywhere in the application
pub const MIN_YEAR: i32 = 1000;
/// Largest year accepted anywhere in the application
pub const MAX_YEAR: i32 = 9999;

/// A calendar month or a calendar year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReportPeriod {
    /// One calendar month (e.g., "2024-06")
    Month { year: i32, month: u32 },

    /// One calendar year (e.g., "2024")
    Year { year: i32 },
}

/// Error type for period construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),

    #[error("year must be a four-digit number (1000-9999), got {0}")]
    InvalidYear(i32),
}

/// Validate a month number (1-12)
pub fn validate_month(month: u32) -> Result<u32, PeriodError> {
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(PeriodError::InvalidMonth(month))
    }
}

/// Validate a four-digit year
pub fn validate_year(year: i32) -> Result<i32, PeriodError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(PeriodError::InvalidYear(year))
    }
}

impl ReportPeriod {
    /// Create a validated monthly period
    pub fn month(year: i32, month: u32) -> Result<Self, PeriodError> {
        Ok(Self::Month {
            year: validate_year(year)?,
            month: validate_month(month)?,
        })
    }

    /// Create a validated yearly period
    pub fn year(year: i32) -> Result<Self, PeriodError> {
        Ok(Self::Year {
            year: validate_year(year)?,
        })
    }

    /// The month containing the given timestamp
    pub fn month_of(timestamp: NaiveDateTime) -> Self {
        Self::Month {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }

    /// Get the first day of this period
    pub fn start_date(&self) -> NaiveDate {
        let (year, month) = match self {
            Self::Month { year, month } => (*year, *month),
            Self::Year { year } => (*year, 1),
        };
        NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Get the last day of this period (inclusive)
    pub fn end_date(&self) -> NaiveDate {
        let next_start = match self {
            Self::Month { year, month: 12 } | Self::Year { year } => {
                NaiveDate::from_ymd_opt(*year + 1, 1, 1)
            }
            Self::Month { year, month } => NaiveDate::from_ymd_opt(*year, *month + 1, 1),
        };
        next_start
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Inclusive timestamp bounds in the stored text format
    ///
    /// Stored timestamps carry whole seconds, so "23:59:59" on the last day
    /// covers the full period.
    pub fn timestamp_bounds(&self) -> (String, String) {
        (
            format!("{} 00:00:00", self.start_date().format("%Y-%m-%d")),
            format!("{} 23:59:59", self.end_date().format("%Y-%m-%d")),
        )
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            Self::Year { year } => write!(f, "{:04}", year),
        }
    }
}
