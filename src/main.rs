use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fintrack::audit::AuditLogger;
use fintrack::cli::{handle_audit_command, Console, Menu};
use fintrack::config::{FinTrackPaths, Settings};
use fintrack::storage::{Storage, SCHEMA_VERSION};

#[derive(Parser)]
#[command(
    name = "fintrack",
    version,
    about = "Terminal-based personal finance tracker",
    long_about = "fintrack records income and expenses, tracks monthly budgets per \
                  category and produces monthly and yearly savings reports, all \
                  stored in a local SQLite database."
)]
struct Cli {
    /// Directory holding the database, settings and audit log
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive menu (default)
    Menu,

    /// Create the data directory, settings file and database
    Init,

    /// Show current configuration and paths
    Config,

    /// Show recent entries from the audit log
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = FinTrackPaths::resolve(cli.data_dir)?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings.log_level, cli.verbose);

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let storage = Storage::open(&paths).context("Failed to open the database")?;

            let stdin = io::stdin();
            let hide_passwords = settings.hide_password_input && stdin.is_terminal();
            let console = Console::new(stdin.lock(), io::stdout().lock())
                .with_hidden_passwords(hide_passwords);

            Menu::new(&storage, &settings, console).run()?;
        }
        Commands::Init => {
            println!("Initializing fintrack at: {}", paths.base_dir().display());
            Storage::open(&paths).context("Failed to create the database")?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'fintrack' to register and start tracking.");
        }
        Commands::Config => {
            println!("fintrack Configuration");
            println!("======================");
            println!("Data directory: {}", paths.base_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Database:       {}", paths.database_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!("Initialized:    {}", paths.is_initialized());
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Date format:      {}", settings.date_format);
            println!("  Log level:        {}", settings.log_level);
            println!("  Hide passwords:   {}", settings.hide_password_input);
            println!(
                "  Argon2 cost:      m={} KiB, t={}, p={}",
                settings.password_hashing.memory_cost,
                settings.password_hashing.time_cost,
                settings.password_hashing.parallelism
            );
            println!("  Schema version:   {}", SCHEMA_VERSION);
        }
        Commands::Audit { limit } => {
            let logger = AuditLogger::new(paths.audit_log());
            handle_audit_command(&logger, limit, &mut io::stdout().lock())?;
        }
    }

    Ok(())
}

/// Log to stderr; `-v` flags override the configured level
fn init_tracing(configured: &str, verbose: u8) {
    let directive = match verbose {
        0 => configured,
        1 => "fintrack=info",
        2 => "fintrack=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
