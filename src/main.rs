use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ledgerlink::audit::OperationLogger;
use ledgerlink::cli::{
    handle_account_command, handle_auto_reconcile_command, handle_candidates_command,
    handle_import_command, handle_obligation_command, handle_reconcile_command,
    handle_settle_command, AccountCommands, ObligationCommands,
};
use ledgerlink::config::{paths::LedgerPaths, settings::Settings};
use ledgerlink::models::ObligationKind;
use ledgerlink::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "ledgerlink",
    author = "Kaylee Beyene",
    version,
    about = "Bank statement ingestion and reconciliation engine",
    long_about = "ledgerlink imports parsed bank statement rows into a canonical \
                  ledger, guards against duplicate and synthetic data, and links \
                  movements to expected income, expense, and capex records by \
                  confidence-scored matching."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and default settings
    Init,

    /// Import a bank statement CSV
    Import {
        /// Path to the statement file
        file: PathBuf,
        /// Destination account (name or ID); omit to resolve by IBAN
        #[arg(short, long)]
        account: Option<String>,
    },

    /// Show reconciliation candidates for every unreconciled movement
    Candidates,

    /// Link every movement with exactly one high-confidence candidate
    #[command(name = "auto-reconcile")]
    AutoReconcile,

    /// Manually link an obligation to a movement
    Reconcile {
        /// Kind: income, expense, or capex
        kind: ObligationKind,
        /// Obligation ID
        obligation: String,
        /// Movement ID
        movement: String,
    },

    /// Mark an obligation as settled outside the bank statement
    Settle {
        /// Kind: income, expense, or capex
        kind: ObligationKind,
        /// Obligation ID
        obligation: String,
        /// Payment method (e.g. cash, card)
        #[arg(short, long)]
        method: String,
        /// Settlement date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Obligation management commands
    #[command(subcommand)]
    Obligation(ObligationCommands),

    /// Show recent operation log entries
    Log {
        /// Number of entries to show
        #[arg(short, long, default_value = "10")]
        count: usize,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = LedgerPaths::new()?;

    if let Commands::Init = cli.command {
        initialize_storage(&paths)?;
        println!("Initialized ledgerlink at {}", paths.base_dir().display());
        return Ok(());
    }

    let settings = Settings::load_or_create(&paths)?;
    let logger = OperationLogger::new(paths.operation_log());
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Commands::Init => unreachable!(),

        Commands::Import { file, account } => {
            handle_import_command(&storage, &logger, &settings, &file, account.as_deref())?;
        }

        Commands::Candidates => handle_candidates_command(&storage)?,

        Commands::AutoReconcile => handle_auto_reconcile_command(&storage, &logger)?,

        Commands::Reconcile {
            kind,
            obligation,
            movement,
        } => handle_reconcile_command(&storage, &logger, kind, &obligation, &movement)?,

        Commands::Settle {
            kind,
            obligation,
            method,
            date,
            notes,
        } => handle_settle_command(
            &storage,
            &logger,
            kind,
            &obligation,
            &method,
            date.as_deref(),
            notes,
        )?,

        Commands::Account(cmd) => handle_account_command(&storage, cmd)?,

        Commands::Obligation(cmd) => handle_obligation_command(&storage, cmd)?,

        Commands::Log { count } => {
            for entry in logger.read_recent(count)? {
                println!("{}", entry.format_human_readable());
            }
        }

        Commands::Config => {
            println!("Base directory: {}", storage.paths().base_dir().display());
            println!("Data directory: {}", storage.paths().data_dir().display());
            println!("Operation log:  {}", storage.paths().operation_log().display());
            println!("Demo mode:      {}", settings.demo_mode);
            println!("Movements:      {}", storage.movements.count()?);
            println!("Obligations:    {}", storage.obligations.count()?);
        }
    }

    Ok(())
}
