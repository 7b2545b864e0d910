//! Interactive menu session
//!
//! A top-level menu (register, login, exit) and, once logged in, the user
//! menu over transactions, reports and budgets. Recoverable errors are
//! printed and the menu is shown again; storage and I/O failures end the
//! session. End of input exits cleanly from any prompt.

use std::io::{BufRead, Write};

use crate::config::Settings;
use crate::display::{
    format_budget_status, format_budget_warning, format_period_report, format_transaction_details,
    format_transaction_table,
};
use crate::error::FinanceResult;
use crate::models::{
    BudgetChange, Money, NewTransaction, ReportPeriod, TransactionId, TransactionKind,
    TransactionUpdate, UserId,
};
use crate::services::{AuthService, BudgetService, LedgerService, ReportService};
use crate::storage::Storage;

use super::console::Console;

/// Whether the session keeps going after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Unwrap a prompt answer, ending the session at end of input
macro_rules! ask {
    ($prompt:expr) => {
        match $prompt? {
            Some(value) => value,
            None => return Ok(Flow::Quit),
        }
    };
}

const MAIN_MENU: &str = "
--- Personal Finance Management ---
1. Register
2. Login
3. Exit";

const USER_MENU: &str = "
--- User Menu ---
1. Add Transaction
2. Update Transaction
3. Delete Transaction
4. View Transactions
5. Generate Monthly Report
6. Generate Yearly Report
7. Set Budget
8. View Budgets
9. Logout";

pub struct Menu<'a, R, W> {
    storage: &'a Storage,
    settings: &'a Settings,
    console: Console<R, W>,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(storage: &'a Storage, settings: &'a Settings, console: Console<R, W>) -> Self {
        Self {
            storage,
            settings,
            console,
        }
    }

    /// Run until the user exits or input ends
    pub fn run(&mut self) -> FinanceResult<()> {
        loop {
            self.console.say(MAIN_MENU)?;
            let Some(choice) = self.console.prompt("Choose an option: ")? else {
                break;
            };

            let outcome = match choice.as_str() {
                "1" => self.register(),
                "2" => self.login(),
                "3" => break,
                _ => self.invalid_choice(),
            };
            if self.recover(outcome)? == Flow::Quit {
                break;
            }
        }

        self.console.say("Goodbye!")
    }

    /// Report a recoverable error and carry on; fatal errors propagate
    fn recover(&mut self, outcome: FinanceResult<Flow>) -> FinanceResult<Flow> {
        match outcome {
            Ok(flow) => Ok(flow),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                if e.is_invalid_input() || e.is_not_found() {
                    tracing::debug!(error = %e, "rejected request");
                } else {
                    tracing::info!(error = %e, "action failed");
                }
                self.console.say(format!("Error: {}", e))?;
                Ok(Flow::Continue)
            }
        }
    }

    fn invalid_choice(&mut self) -> FinanceResult<Flow> {
        self.console.say("Invalid choice. Please try again.")?;
        Ok(Flow::Continue)
    }

    fn auth(&self) -> AuthService<'a> {
        AuthService::new(self.storage, &self.settings.password_hashing)
    }

    fn register(&mut self) -> FinanceResult<Flow> {
        let username = ask!(self.console.prompt("Enter a username: "));
        let password = ask!(self.console.prompt_password("Enter a password: "));

        self.auth().register(&username, &password)?;
        self.console.say("User registered successfully!")?;
        Ok(Flow::Continue)
    }

    fn login(&mut self) -> FinanceResult<Flow> {
        let username = ask!(self.console.prompt("Enter your username: "));
        let password = ask!(self.console.prompt_password("Enter your password: "));

        let user_id = self.auth().login(&username, &password)?;
        self.console.say("Login successful!")?;
        self.user_menu(user_id)
    }

    fn user_menu(&mut self, user_id: UserId) -> FinanceResult<Flow> {
        loop {
            self.console.say(USER_MENU)?;
            let choice = ask!(self.console.prompt("Choose an option: "));

            let outcome = match choice.as_str() {
                "1" => self.add_transaction(user_id),
                "2" => self.update_transaction(user_id),
                "3" => self.delete_transaction(user_id),
                "4" => self.view_transactions(user_id),
                "5" => self.monthly_report(user_id),
                "6" => self.yearly_report(user_id),
                "7" => self.set_budget(user_id),
                "8" => self.view_budgets(user_id),
                "9" => {
                    self.console.say("Logged out successfully.")?;
                    return Ok(Flow::Continue);
                }
                _ => self.invalid_choice(),
            };
            if self.recover(outcome)? == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    fn add_transaction(&mut self, user_id: UserId) -> FinanceResult<Flow> {
        let kind: TransactionKind = ask!(self
            .console
            .prompt_parsed("Enter transaction type (Income/Expense): ", "transaction type"));
        let amount: Money = ask!(self.console.prompt_parsed("Enter amount: ", "amount"));
        let category = ask!(self.console.prompt("Enter category: "));
        let description = ask!(self.console.prompt("Enter description (optional): "));

        let input = NewTransaction::new(kind, amount, category).with_description(description);
        let added = LedgerService::new(self.storage).add(user_id, input)?;

        if let Some(warning) = &added.budget_warning {
            self.console
                .say(format_budget_warning(warning, self.settings))?;
        }
        self.console.say(format!(
            "Transaction added successfully (ID {}).",
            added.transaction.id
        ))?;
        Ok(Flow::Continue)
    }

    fn update_transaction(&mut self, user_id: UserId) -> FinanceResult<Flow> {
        let id: TransactionId = ask!(self
            .console
            .prompt_parsed("Enter transaction ID to update: ", "transaction ID"));
        let ledger = LedgerService::new(self.storage);
        ledger.get_owned(id, user_id)?;

        let amount: Option<Money> = ask!(self
            .console
            .prompt_optional("Enter new amount (leave blank to skip): ", "amount"));
        let category = ask!(self
            .console
            .prompt("Enter new category (leave blank to skip): "));
        let description = ask!(self
            .console
            .prompt("Enter new description (leave blank to skip): "));

        let update = TransactionUpdate {
            amount,
            category: non_blank(category),
            description: non_blank(description),
        };
        if update.is_empty() {
            self.console.say("Nothing to update.")?;
            return Ok(Flow::Continue);
        }

        let updated = ledger.update(id, user_id, update)?;
        self.console.say("Transaction updated successfully.")?;
        self.console
            .print(format_transaction_details(&updated, self.settings))?;
        Ok(Flow::Continue)
    }

    fn delete_transaction(&mut self, user_id: UserId) -> FinanceResult<Flow> {
        let id: TransactionId = ask!(self
            .console
            .prompt_parsed("Enter transaction ID to delete: ", "transaction ID"));
        let ledger = LedgerService::new(self.storage);
        ledger.get_owned(id, user_id)?;

        let confirmed = ask!(self
            .console
            .confirm(&format!("Are you sure you want to delete transaction ID {}?", id)));
        if !confirmed {
            self.console.say("Deletion canceled.")?;
            return Ok(Flow::Continue);
        }

        ledger.delete(id, user_id)?;
        self.console.say("Transaction deleted successfully.")?;
        Ok(Flow::Continue)
    }

    fn view_transactions(&mut self, user_id: UserId) -> FinanceResult<Flow> {
        let transactions = LedgerService::new(self.storage).list(user_id)?;

        if !transactions.is_empty() {
            self.console.say("\n--- Your Transactions ---")?;
        }
        self.console
            .print(format_transaction_table(&transactions, self.settings))?;
        Ok(Flow::Continue)
    }

    fn monthly_report(&mut self, user_id: UserId) -> FinanceResult<Flow> {
        let year: i32 = ask!(self.console.prompt_parsed("Enter year (YYYY): ", "year"));
        let month: u32 = ask!(self.console.prompt_parsed("Enter month (1-12): ", "month"));

        let report = ReportService::new(self.storage).monthly(user_id, year, month)?;
        self.console.say("")?;
        self.console
            .print(format_period_report(&report, self.settings))?;
        Ok(Flow::Continue)
    }

    fn yearly_report(&mut self, user_id: UserId) -> FinanceResult<Flow> {
        let year: i32 = ask!(self.console.prompt_parsed("Enter year (YYYY): ", "year"));

        let report = ReportService::new(self.storage).yearly(user_id, year)?;
        self.console.say("")?;
        self.console
            .print(format_period_report(&report, self.settings))?;
        Ok(Flow::Continue)
    }

    fn set_budget(&mut self, user_id: UserId) -> FinanceResult<Flow> {
        let category = ask!(self.console.prompt("Enter budget category: "));
        let amount: Money = ask!(self.console.prompt_parsed("Enter budget amount: ", "amount"));
        let month: u32 = ask!(self.console.prompt_parsed("Enter month (1-12): ", "month"));
        let year: i32 = ask!(self.console.prompt_parsed("Enter year (YYYY): ", "year"));

        let (_, change) =
            BudgetService::new(self.storage).set(user_id, &category, amount, month, year)?;
        self.console.say(match change {
            BudgetChange::Created => "Budget set successfully.",
            BudgetChange::Updated => "Budget updated successfully.",
        })?;
        Ok(Flow::Continue)
    }

    fn view_budgets(&mut self, user_id: UserId) -> FinanceResult<Flow> {
        let month: u32 = ask!(self.console.prompt_parsed("Enter month (1-12): ", "month"));
        let year: i32 = ask!(self.console.prompt_parsed("Enter year (YYYY): ", "year"));

        let period = ReportPeriod::month(year, month)?;
        let statuses = BudgetService::new(self.storage).status(user_id, month, year)?;
        self.console.say("")?;
        self.console
            .print(format_budget_status(&statuses, &period, self.settings))?;
        Ok(Flow::Continue)
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PasswordHashParams;
    use std::io::Cursor;

    fn settings() -> Settings {
        Settings {
            password_hashing: PasswordHashParams::with_values(8, 1, 1),
            ..Settings::default()
        }
    }

    fn run_script(storage: &Storage, script: &str) -> String {
        run_bytes(storage, script.as_bytes())
    }

    fn run_bytes(storage: &Storage, input: &[u8]) -> String {
        let settings = settings();
        let console = Console::new(Cursor::new(input.to_vec()), Vec::new());
        let mut menu = Menu::new(storage, &settings, console);
        menu.run().unwrap();
        String::from_utf8(menu.console.output().clone()).unwrap()
    }

    #[test]
    fn test_register_login_logout_exit() {
        let storage = Storage::open_in_memory().unwrap();
        let out = run_script(&storage, "1\nalice\npw\n2\nalice\npw\n9\n3\n");

        assert!(out.contains("User registered successfully!"));
        assert!(out.contains("Login successful!"));
        assert!(out.contains("Logged out successfully."));
        assert!(out.trim_end().ends_with("Goodbye!"));
    }

    #[test]
    fn test_errors_return_to_menu() {
        let storage = Storage::open_in_memory().unwrap();
        let out = run_script(&storage, "1\nalice\npw\n1\nalice\nother\n2\nalice\nbad\n7\n3\n");

        assert!(out.contains("Error: Username already exists: alice"));
        assert!(out.contains("Error: Invalid username or password"));
        assert!(out.contains("Invalid choice. Please try again."));
        assert!(out.contains("Goodbye!"));
    }

    #[test]
    fn test_add_with_budget_warning_and_report() {
        let storage = Storage::open_in_memory().unwrap();
        let now = chrono::Local::now();
        let (year, month) = (
            chrono::Datelike::year(&now),
            chrono::Datelike::month(&now),
        );
        let script = format!(
            "1\nalice\npw\n2\nalice\npw\n\
             7\nFood\n100\n{month}\n{year}\n\
             1\nExpense\n150\nFood\n\n\
             1\nincome\n1000\nSalary\nmonthly pay\n\
             5\n{year}\n{month}\n\
             8\n{month}\n{year}\n\
             4\n9\n3\n"
        );
        let out = run_script(&storage, &script);

        assert!(out.contains("Budget set successfully."));
        assert!(out.contains("Warning: Adding this expense will exceed your budget for Food!"));
        assert!(out.contains("Total Income:"));
        assert!(out.contains("$1000.00"));
        assert!(out.contains("$850.00"));
        assert!(out.contains("OVER"));
        assert!(out.contains("monthly pay"));
    }

    #[test]
    fn test_invalid_input_is_not_fatal() {
        let storage = Storage::open_in_memory().unwrap();
        let out = run_script(
            &storage,
            "1\nalice\npw\n2\nalice\npw\n1\nTransfer\n1\nabc\n5\n2024\n13\n2\n99\n9\n3\n",
        );

        assert!(out.contains("Error: Invalid input: 'Transfer' is not a valid transaction type"));
        assert!(out.contains("Error: Invalid input: 'abc' is not a valid transaction type"));
        assert!(out.contains("Error: Invalid input: month must be between 1 and 12, got 13"));
        assert!(out.contains("Transaction 99 not found"));
    }

    #[test]
    fn test_non_utf8_line_is_reported() {
        let storage = Storage::open_in_memory().unwrap();
        let out = run_bytes(
            &storage,
            b"1\nalice\npw\n2\nalice\npw\n\
              1\nExpense\n10\nCaf\xe9\n\
              1\nExpense\n10\nFood\n\n\
              9\n3\n",
        );

        assert!(out.contains("Error: Invalid input: input is not valid UTF-8 text"));
        assert!(out.contains("Transaction added successfully (ID 1)."));
        assert!(out.trim_end().ends_with("Goodbye!"));
        assert_eq!(storage.transactions().count_for_user(UserId::new(1)).unwrap(), 1);
    }

    #[test]
    fn test_oversized_amounts_keep_session_alive() {
        let storage = Storage::open_in_memory().unwrap();
        let out = run_script(
            &storage,
            "1\nalice\npw\n2\nalice\npw\n\
             1\nIncome\n90000000000000000\nSalary\n\n\
             7\nFood\n90000000000000000\n6\n2024\n\
             5\n2024\n6\n\
             9\n3\n",
        );

        assert!(out.contains("Error: Invalid input: amount cannot exceed $1000000000.00"));
        assert!(out.contains("Error: Invalid input: budget amount cannot exceed $1000000000.00"));
        assert!(out.contains("Monthly Report for 2024-06"));
        assert!(out.trim_end().ends_with("Goodbye!"));
    }

    #[test]
    fn test_update_and_delete_flow() {
        let storage = Storage::open_in_memory().unwrap();
        let out = run_script(
            &storage,
            "1\nalice\npw\n2\nalice\npw\n\
             1\nExpense\n20\nFood\nlunch\n\
             2\n1\n25.50\n\n\n\
             3\n1\nn\n\
             3\n1\ny\n\
             4\n9\n3\n",
        );

        assert!(out.contains("Transaction updated successfully."));
        assert!(out.contains("Amount:      $25.50"));
        assert!(out.contains("Description: lunch"));
        assert!(out.contains("Deletion canceled."));
        assert!(out.contains("Transaction deleted successfully."));
        assert!(out.contains("No transactions found."));
    }

    #[test]
    fn test_eof_exits_cleanly() {
        let storage = Storage::open_in_memory().unwrap();
        let out = run_script(&storage, "1\nalice\npw\n2\nalice\npw\n1\nExpense\n");
        assert!(out.trim_end().ends_with("Goodbye!"));
        assert_eq!(storage.transactions().count_for_user(UserId::new(1)).unwrap(), 0);
    }
}
