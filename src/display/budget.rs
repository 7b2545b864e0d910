//! Budget display formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::config::Settings;
use crate::models::{BudgetWarning, CategoryBudgetStatus, ReportPeriod};

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Budget")]
    budgeted: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "")]
    flag: &'static str,
}

/// Budget versus spending table for a month
pub fn format_budget_status(
    statuses: &[CategoryBudgetStatus],
    period: &ReportPeriod,
    settings: &Settings,
) -> String {
    if statuses.is_empty() {
        return format!("No budgets set for {}.\n", period);
    }

    let symbol = settings.currency_symbol.as_str();
    let rows = statuses.iter().map(|s| StatusRow {
        category: s.category.clone(),
        budgeted: s.budgeted.format_with_symbol(symbol),
        spent: s.spent.format_with_symbol(symbol),
        remaining: s.remaining().format_with_symbol(symbol),
        flag: if s.is_over_budget() { "OVER" } else { "" },
    });

    let table = Table::new(rows)
        .with(Style::sharp())
        .modify(Columns::new(1..4), Alignment::right())
        .to_string();

    format!("Budgets for {}:\n{}\n", period, table)
}

/// Warning line printed after an expense pushes a category over budget
pub fn format_budget_warning(warning: &BudgetWarning, settings: &Settings) -> String {
    let symbol = settings.currency_symbol.as_str();
    format!(
        "Warning: Adding this expense will exceed your budget for {}! ({} of {} spent in {}, {} over)",
        warning.category,
        warning.spent.format_with_symbol(symbol),
        warning.budget.format_with_symbol(symbol),
        warning.period,
        warning.overage().format_with_symbol(symbol),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    fn june() -> ReportPeriod {
        ReportPeriod::Month { year: 2024, month: 6 }
    }

    #[test]
    fn test_empty_status() {
        let settings = Settings::default();
        assert_eq!(
            format_budget_status(&[], &june(), &settings),
            "No budgets set for 2024-06.\n"
        );
    }

    #[test]
    fn test_status_flags_overrun() {
        let statuses = vec![
            CategoryBudgetStatus {
                category: "Food".into(),
                budgeted: Money::from_units(100),
                spent: Money::from_units(120),
            },
            CategoryBudgetStatus {
                category: "Fun".into(),
                budgeted: Money::from_units(50),
                spent: Money::zero(),
            },
        ];
        let output = format_budget_status(&statuses, &june(), &Settings::default());
        assert!(output.contains("-$20.00"));
        assert!(output.contains("OVER"));
        assert_eq!(output.matches("OVER").count(), 1);
    }

    #[test]
    fn test_warning_text() {
        let warning = BudgetWarning {
            category: "Food".into(),
            period: june(),
            budget: Money::from_units(100),
            spent: Money::from_units(101),
        };
        let text = format_budget_warning(&warning, &Settings::default());
        assert!(text.starts_with("Warning: Adding this expense will exceed your budget for Food!"));
        assert!(text.contains("$1.00 over"));
    }
}
