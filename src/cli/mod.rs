//! CLI command handlers
//!
//! Bridges clap argument parsing and the interactive menu with the service
//! layer.

pub mod audit;
pub mod console;
pub mod menu;

pub use audit::handle_audit_command;
pub use console::Console;
pub use menu::Menu;
