//! Reconciliation policy
//!
//! Three ways an obligation leaves `Forecast`: the unattended sweep links
//! it when exactly one candidate clears the confidence bar, a manual
//! reconcile links it unconditionally, or an out-of-band settlement closes
//! it with no movement at all. All writes are versioned; a lost race
//! surfaces as `StaleVersion`.

use chrono::NaiveDate;

use crate::audit::{OperationEntry, OperationKind, OperationLogger};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{MovementId, ObligationId, ObligationKind};
use crate::services::matching::MatchingService;
use crate::storage::Storage;

/// Result of an auto-reconciliation sweep
#[derive(Debug, Default)]
pub struct AutoReconcileSummary {
    /// Number of movement/obligation pairs linked
    pub reconciled: usize,
    /// One line per linked pair, skipped ambiguity, or link failure
    pub details: Vec<String>,
}

/// Service for reconciliation operations
pub struct ReconciliationService<'a> {
    storage: &'a Storage,
    logger: &'a OperationLogger,
}

impl<'a> ReconciliationService<'a> {
    /// Create a new reconciliation service
    pub fn new(storage: &'a Storage, logger: &'a OperationLogger) -> Self {
        Self { storage, logger }
    }

    /// Link every unreconciled movement that has exactly one candidate at
    /// or above the auto threshold.
    ///
    /// Two candidates both clearing the bar is ambiguity, not a coin
    /// toss: the movement is left untouched for manual review. Link
    /// failures are recorded and the sweep continues.
    pub fn run_auto_reconciliation(&self) -> LedgerResult<AutoReconcileSummary> {
        let matching = MatchingService::new(self.storage);
        let threshold = matching.weights().auto_threshold;
        let all_candidates = matching.find_reconciliation_candidates()?;

        let mut summary = AutoReconcileSummary::default();

        for movement_candidates in all_candidates {
            let eligible: Vec<_> = movement_candidates
                .candidates
                .iter()
                .filter(|c| c.confidence >= threshold)
                .collect();

            match eligible.len() {
                0 => {}
                1 => {
                    let candidate = eligible[0];
                    match self.link(
                        candidate.kind,
                        candidate.obligation_id,
                        movement_candidates.movement_id,
                    ) {
                        Ok(()) => {
                            summary.reconciled += 1;
                            summary.details.push(format!(
                                "linked {} to {} {} (confidence {:.2}: {})",
                                movement_candidates.movement_id,
                                candidate.kind,
                                candidate.obligation_id,
                                candidate.confidence,
                                candidate.reason
                            ));
                        }
                        Err(e) => {
                            summary.details.push(format!(
                                "failed to link {} to {}: {}",
                                movement_candidates.movement_id, candidate.obligation_id, e
                            ));
                        }
                    }
                }
                n => {
                    summary.details.push(format!(
                        "{}: {} candidates above threshold, left for manual review",
                        movement_candidates.movement_id, n
                    ));
                }
            }
        }

        self.storage.movements.save()?;
        self.storage.obligations.save()?;

        let mut entry = OperationEntry::new(OperationKind::AutoReconcile)
            .with_count("reconciled", summary.reconciled as u64);
        for detail in &summary.details {
            entry = entry.with_detail(detail.clone());
        }
        self.logger.log(&entry)?;

        Ok(summary)
    }

    /// Manually link an obligation to a movement.
    ///
    /// No confidence check; the user has decided. When the movement does
    /// not exist the obligation side is still linked and a warning lands
    /// in the operation log, so a statement re-import can catch up later.
    pub fn reconcile(
        &self,
        kind: ObligationKind,
        obligation_id: ObligationId,
        movement_id: MovementId,
    ) -> LedgerResult<()> {
        let mut entry = OperationEntry::new(OperationKind::Reconcile)
            .with_detail(format!("{} {} <- {}", kind, obligation_id, movement_id));

        let movement_exists = self.storage.movements.get(movement_id)?.is_some();
        if !movement_exists {
            entry = entry.with_detail(format!(
                "warning: movement {} not found; obligation linked anyway",
                movement_id
            ));
        }

        self.link(kind, obligation_id, movement_id)?;

        self.storage.movements.save()?;
        self.storage.obligations.save()?;
        self.logger.log(&entry)?;
        Ok(())
    }

    /// Close an obligation that was paid outside the bank statement.
    ///
    /// No movement is created or touched; the obligation gets the
    /// out-of-band sentinel link so it never shows up as outstanding
    /// again.
    pub fn settle_without_movement(
        &self,
        kind: ObligationKind,
        obligation_id: ObligationId,
        method: &str,
        date: NaiveDate,
        notes: Option<String>,
    ) -> LedgerResult<()> {
        let mut obligation = self
            .storage
            .obligations
            .get(kind, obligation_id)?
            .ok_or_else(|| LedgerError::obligation_not_found(obligation_id.to_string()))?;

        if !obligation.is_forecast() {
            return Err(LedgerError::Reconciliation(format!(
                "obligation {} is already {}",
                obligation_id, obligation.state
            )));
        }

        obligation.settle_out_of_band(method, date, notes);
        self.storage.obligations.update_versioned(obligation)?;
        self.storage.obligations.save()?;

        self.logger.log(
            &OperationEntry::new(OperationKind::Settle)
                .with_detail(format!("{} {} settled via {}", kind, obligation_id, method)),
        )?;
        Ok(())
    }

    /// Link both sides. The obligation must still be outstanding; the
    /// movement side is written first and is permissive about absence.
    fn link(
        &self,
        kind: ObligationKind,
        obligation_id: ObligationId,
        movement_id: MovementId,
    ) -> LedgerResult<()> {
        let mut obligation = self
            .storage
            .obligations
            .get(kind, obligation_id)?
            .ok_or_else(|| LedgerError::obligation_not_found(obligation_id.to_string()))?;

        if !obligation.is_forecast() {
            return Err(LedgerError::Reconciliation(format!(
                "obligation {} is already {}",
                obligation_id, obligation.state
            )));
        }

        if let Some(mut movement) = self.storage.movements.get(movement_id)? {
            movement.link_obligation(kind, obligation_id);
            self.storage.movements.update_versioned(movement)?;
        }

        obligation.link_movement(movement_id);
        self.storage.obligations.update_versioned(obligation)?;
        Ok(())
    }
}
