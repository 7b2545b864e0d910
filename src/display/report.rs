//! Report formatting for terminal output

use crate::config::Settings;
use crate::models::ReportPeriod;
use crate::services::PeriodReport;

const REPORT_WIDTH: usize = 32;

/// Format an income/expense/savings summary
pub fn format_period_report(report: &PeriodReport, settings: &Settings) -> String {
    let symbol = settings.currency_symbol.as_str();
    let title = match report.period {
        ReportPeriod::Month { .. } => format!("Monthly Report for {}", report.period),
        ReportPeriod::Year { .. } => format!("Yearly Report for {}", report.period),
    };

    let line = |label: &str, value: String| format!("{:<14}{:>18}\n", label, value);

    let mut output = String::new();
    output.push_str(&title);
    output.push('\n');
    output.push_str(&separator(REPORT_WIDTH));
    output.push('\n');
    output.push_str(&line("Total Income:", report.income.format_with_symbol(symbol)));
    output.push_str(&line("Total Expenses:", report.expenses.format_with_symbol(symbol)));
    output.push_str(&separator(REPORT_WIDTH));
    output.push('\n');
    output.push_str(&line("Savings:", report.savings().format_with_symbol(symbol)));
    output
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_monthly_report_layout() {
        let report = PeriodReport {
            period: ReportPeriod::Month { year: 2024, month: 6 },
            income: Money::from_units(1000),
            expenses: Money::from_units(300),
        };
        let output = format_period_report(&report, &Settings::default());

        assert!(output.starts_with("Monthly Report for 2024-06\n"));
        assert!(output.contains("$1000.00"));
        assert!(output.contains("$300.00"));
        assert!(output.contains("Savings:"));
        assert!(output.contains("$700.00"));
    }

    #[test]
    fn test_negative_savings() {
        let report = PeriodReport {
            period: ReportPeriod::Year { year: 2023 },
            income: Money::zero(),
            expenses: Money::from_cents(4250),
        };
        let output = format_period_report(&report, &Settings::default());

        assert!(output.starts_with("Yearly Report for 2023\n"));
        assert!(output.contains("-$42.50"));
    }
}
