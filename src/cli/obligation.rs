//! Obligation CLI commands
//!
//! Minimal create/list surface so forecast records can be seeded and
//! inspected; the lifecycle itself is driven by the reconcile commands.

use chrono::NaiveDate;
use clap::Subcommand;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, Obligation, ObligationKind};
use crate::storage::Storage;

/// Obligation subcommands
#[derive(Subcommand)]
pub enum ObligationCommands {
    /// Record a forecast obligation
    Add {
        /// Kind: income, expense, or capex
        kind: ObligationKind,
        /// Counterparty text, used for matching
        counterparty: String,
        /// Expected amount (e.g. "1200.00")
        amount: String,
        /// Expected date (YYYY-MM-DD)
        date: String,
    },
    /// List obligations of one kind
    List {
        /// Kind: income, expense, or capex
        kind: ObligationKind,
        /// Include reconciled and settled obligations
        #[arg(short, long)]
        all: bool,
    },
}

/// Handle an obligation command
pub fn handle_obligation_command(storage: &Storage, cmd: ObligationCommands) -> LedgerResult<()> {
    match cmd {
        ObligationCommands::Add {
            kind,
            counterparty,
            amount,
            date,
        } => {
            let amount = Money::parse(&amount).map_err(|e| {
                LedgerError::Validation(format!("Invalid amount '{}': {}", amount, e))
            })?;
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|e| {
                LedgerError::Validation(format!("Invalid date '{}': {}", date, e))
            })?;

            let obligation = Obligation::new(kind, counterparty, amount, date);
            println!("Recorded {} obligation: {}", kind, obligation.id);
            println!("  {} expected on {}", obligation.expected_amount, date);

            storage.obligations.insert(obligation)?;
            storage.obligations.save()?;
        }

        ObligationCommands::List { kind, all } => {
            let obligations = storage.obligations.get_by_kind(kind)?;
            let mut shown = 0;
            for obligation in obligations {
                if !all && !obligation.is_forecast() {
                    continue;
                }
                shown += 1;
                println!(
                    "{}  {}  {}  {}  {}",
                    obligation.id,
                    obligation.expected_date,
                    obligation.expected_amount,
                    obligation.state,
                    obligation.counterparty_text
                );
            }
            if shown == 0 {
                println!("No {} obligations.", kind);
            }
        }
    }

    Ok(())
}
