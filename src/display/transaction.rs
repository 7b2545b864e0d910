//! Transaction display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::format_datetime;
use crate::config::Settings;
use crate::models::Transaction;

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Date")]
    date: String,
}

impl TransactionRow {
    fn new(txn: &Transaction, settings: &Settings) -> Self {
        Self {
            id: txn.id.to_string(),
            kind: txn.kind.to_string(),
            amount: txn.amount.format_with_symbol(&settings.currency_symbol),
            category: txn.category.clone(),
            description: txn.description.clone().unwrap_or_default(),
            date: format_datetime(txn.date, &settings.date_format),
        }
    }
}

/// Format transactions as a table, in the order given
pub fn format_transaction_table(transactions: &[Transaction], settings: &Settings) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows = transactions
        .iter()
        .map(|txn| TransactionRow::new(txn, settings));
    let mut output = Table::new(rows).with(Style::sharp()).to_string();
    output.push('\n');
    output
}

/// Multi-line view of one transaction
pub fn format_transaction_details(txn: &Transaction, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Type:        {}\n", txn.kind));
    output.push_str(&format!(
        "Amount:      {}\n",
        txn.amount.format_with_symbol(&settings.currency_symbol)
    ));
    output.push_str(&format!("Category:    {}\n", txn.category));
    if let Some(description) = &txn.description {
        output.push_str(&format!("Description: {}\n", description));
    }
    output.push_str(&format!(
        "Date:        {}\n",
        format_datetime(txn.date, &settings.date_format)
    ));

    output
}
