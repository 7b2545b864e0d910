//! Display formatting for terminal output
//!
//! Turns models and reports into the text the interactive menu prints.
//! Money uses the configured currency symbol and timestamps the configured
//! strftime format.

pub mod budget;
pub mod report;
pub mod transaction;

pub use budget::{format_budget_status, format_budget_warning};
pub use report::format_period_report;
pub use transaction::{format_transaction_details, format_transaction_table};

use std::fmt::Write;

use chrono::NaiveDateTime;

use crate::models::transaction::TIMESTAMP_FORMAT;

/// Format a timestamp, falling back to the storage format when `pattern`
/// is not a valid strftime string
pub fn format_datetime(timestamp: NaiveDateTime, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", timestamp.format(pattern)).is_err() {
        return timestamp.format(TIMESTAMP_FORMAT).to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_datetime() {
        let ts = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(8, 5, 0)
            .unwrap();
        assert_eq!(format_datetime(ts, "%d/%m/%Y"), "15/06/2024");
        assert_eq!(format_datetime(ts, "%Q"), "2024-06-15 08:05:00");
    }
}
