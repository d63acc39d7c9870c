//! Import CLI command

use std::path::Path;

use crate::audit::OperationLogger;
use crate::config::Settings;
use crate::error::LedgerResult;
use crate::ingest::StatementFile;
use crate::services::{ImportOutcome, ImportService};
use crate::storage::Storage;

/// Handle `ledgerlink import <file> [--account <name>]`
pub fn handle_import_command(
    storage: &Storage,
    logger: &OperationLogger,
    settings: &Settings,
    file: &Path,
    account: Option<&str>,
) -> LedgerResult<()> {
    let statement = StatementFile::from_csv_path(file)?;

    let destination = match account {
        Some(text) => Some(super::find_account(storage, text)?.id),
        None => None,
    };

    let service = ImportService::new(storage, logger, settings);
    match service.import_bank_statement(&statement, destination, Some("cli"))? {
        ImportOutcome::Completed(summary) => {
            println!("Imported {} (batch {})", statement.source_name, summary.batch_id);
            println!("  Inserted:   {}", summary.inserted);
            println!("  Duplicates: {}", summary.duplicates);
            println!("  Errors:     {}", summary.errors);
        }
        ImportOutcome::RequiresAccountSelection {
            detected_iban,
            candidates,
        } => {
            match detected_iban {
                Some(iban) => println!("Several accounts match IBAN {}:", iban),
                None => println!("Could not determine the destination account. Candidates:"),
            }
            for candidate in candidates {
                println!(
                    "  {}  {}  (confidence {:.2})",
                    candidate.account_id, candidate.display_name, candidate.confidence
                );
            }
            println!("Nothing was imported. Re-run with --account to pick one.");
        }
    }

    Ok(())
}
