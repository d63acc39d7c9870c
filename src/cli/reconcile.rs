//! Reconciliation CLI commands

use chrono::{NaiveDate, Utc};

use crate::audit::OperationLogger;
use crate::error::{LedgerError, LedgerResult};
use crate::models::ObligationKind;
use crate::services::{MatchingService, ReconciliationService};
use crate::storage::Storage;

/// Handle `ledgerlink candidates`
pub fn handle_candidates_command(storage: &Storage) -> LedgerResult<()> {
    let service = MatchingService::new(storage);
    let results = service.find_reconciliation_candidates()?;

    if results.is_empty() {
        println!("No unreconciled movements.");
        return Ok(());
    }

    for movement_candidates in results {
        let movement = storage
            .movements
            .get(movement_candidates.movement_id)?
            .ok_or_else(|| {
                LedgerError::movement_not_found(movement_candidates.movement_id.to_string())
            })?;

        println!("{}  {}", movement.id, movement);
        if movement_candidates.candidates.is_empty() {
            println!("  no candidates");
            continue;
        }
        for candidate in movement_candidates.candidates {
            let auto = if candidate.auto_eligible { " [auto]" } else { "" };
            println!(
                "  {:.2}  {} {}{}  {}",
                candidate.confidence, candidate.kind, candidate.obligation_id, auto,
                candidate.reason
            );
        }
    }

    Ok(())
}

/// Handle `ledgerlink auto-reconcile`
pub fn handle_auto_reconcile_command(
    storage: &Storage,
    logger: &OperationLogger,
) -> LedgerResult<()> {
    let service = ReconciliationService::new(storage, logger);
    let summary = service.run_auto_reconciliation()?;

    println!("Reconciled {} movement(s)", summary.reconciled);
    for detail in summary.details {
        println!("  {}", detail);
    }

    Ok(())
}

/// Handle `ledgerlink reconcile <kind> <obligation> <movement>`
pub fn handle_reconcile_command(
    storage: &Storage,
    logger: &OperationLogger,
    kind: ObligationKind,
    obligation: &str,
    movement: &str,
) -> LedgerResult<()> {
    let obligation = super::find_obligation(storage, kind, obligation)?;

    // The movement reference may point at a movement the ledger has not
    // seen yet; pass the parsed id through and let the service decide.
    let movement_id = match super::find_movement(storage, movement) {
        Ok(found) => found.id,
        Err(e) if e.is_not_found() => movement
            .parse()
            .map_err(|_| LedgerError::movement_not_found(movement))?,
        Err(e) => return Err(e),
    };

    let service = ReconciliationService::new(storage, logger);
    service.reconcile(kind, obligation.id, movement_id)?;

    println!("Linked {} {} to {}", kind, obligation.id, movement_id);
    Ok(())
}

/// Handle `ledgerlink settle <kind> <obligation> --method <m> [--date] [--notes]`
pub fn handle_settle_command(
    storage: &Storage,
    logger: &OperationLogger,
    kind: ObligationKind,
    obligation: &str,
    method: &str,
    date: Option<&str>,
    notes: Option<String>,
) -> LedgerResult<()> {
    let obligation = super::find_obligation(storage, kind, obligation)?;

    let date = match date {
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| {
            LedgerError::Validation(format!("Invalid date '{}': {}", text, e))
        })?,
        None => Utc::now().date_naive(),
    };

    let service = ReconciliationService::new(storage, logger);
    service.settle_without_movement(kind, obligation.id, method, date, notes)?;

    println!("Settled {} {} via {} on {}", kind, obligation.id, method, date);
    Ok(())
}
