//! fintrack - Terminal-based personal finance tracker
//!
//! Users register and log in, record income and expense transactions, set
//! monthly spending budgets per category and generate monthly or yearly
//! income/expense/savings reports. Everything lives in one local SQLite
//! database.
//!
//! # Architecture
//!
//! - `config`: data directory resolution and JSON settings
//! - `error`: the crate error type
//! - `models`: users, transactions, budgets, money and periods
//! - `storage`: SQLite schema and repositories
//! - `crypto`: Argon2id credential hashing
//! - `services`: auth, ledger, budget and report business rules
//! - `audit`: append-only JSONL log of every mutation
//! - `display`: terminal formatting
//! - `cli`: the interactive menu and command handlers
//!
//! # Example
//!
//! ```rust,no_run
//! use fintrack::config::{FinTrackPaths, Settings};
//! use fintrack::services::ReportService;
//! use fintrack::storage::Storage;
//!
//! # fn main() -> fintrack::error::FinanceResult<()> {
//! let paths = FinTrackPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(&paths)?;
//! let user = fintrack::services::AuthService::new(&storage, &settings.password_hashing)
//!     .login("alice", "password")?;
//! let june = ReportService::new(&storage).monthly(user, 2024, 6)?;
//! println!("saved {}", june.savings());
//! # Ok(())
//! # }
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{FinanceError, FinanceResult};
