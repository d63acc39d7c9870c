//! Matching service
//!
//! Assembles scored candidate lists for every unreconciled movement.
//! Ordering is deterministic: movements by id, candidates by confidence
//! descending with obligation id as the tie-break, so two runs over the
//! same data produce the same output.

use std::cmp::Ordering;

use crate::error::LedgerResult;
use crate::matching::{score, MatchWeights};
use crate::models::{Movement, MovementId, ObligationId, ObligationKind};
use crate::storage::Storage;

/// One scored obligation candidate for a movement
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    pub kind: ObligationKind,
    pub obligation_id: ObligationId,
    pub confidence: f64,
    pub auto_eligible: bool,
    pub reason: String,
}

/// All candidates for one movement
#[derive(Debug, Clone)]
pub struct MovementCandidates {
    pub movement_id: MovementId,
    pub candidates: Vec<MatchCandidate>,
}

/// Service for movement/obligation matching
pub struct MatchingService<'a> {
    storage: &'a Storage,
    weights: MatchWeights,
}

impl<'a> MatchingService<'a> {
    /// Create a matching service with the production weight table
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            weights: MatchWeights::DEFAULT,
        }
    }

    /// Override the weight table
    pub fn with_weights(storage: &'a Storage, weights: MatchWeights) -> Self {
        Self { storage, weights }
    }

    pub fn weights(&self) -> &MatchWeights {
        &self.weights
    }

    /// Candidates for every unreconciled movement.
    ///
    /// Movements with no scoring candidate at all still appear, with an
    /// empty list, so callers can tell "nothing matched" from "not
    /// considered".
    pub fn find_reconciliation_candidates(&self) -> LedgerResult<Vec<MovementCandidates>> {
        let movements = self.storage.movements.get_unreconciled()?;

        let mut results = Vec::with_capacity(movements.len());
        for movement in &movements {
            results.push(MovementCandidates {
                movement_id: movement.id,
                candidates: self.candidates_for(movement)?,
            });
        }
        Ok(results)
    }

    /// Score one movement against every outstanding obligation of the
    /// matching sign: inflows against income, outflows against expenses
    /// and capex.
    pub fn candidates_for(&self, movement: &Movement) -> LedgerResult<Vec<MatchCandidate>> {
        let mut candidates = Vec::new();

        for &kind in ObligationKind::for_inflow(movement.is_inflow()) {
            for obligation in self.storage.obligations.get_forecast_by_kind(kind)? {
                let result = score(movement, &obligation, &self.weights);
                if result.confidence <= 0.0 {
                    continue;
                }
                candidates.push(MatchCandidate {
                    kind,
                    obligation_id: obligation.id,
                    confidence: result.confidence,
                    auto_eligible: result.auto_eligible,
                    reason: result.reason,
                });
            }
        }

        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.obligation_id.cmp(&b.obligation_id))
        });

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerPaths;
    use crate::models::{AccountId, BatchId, Money, Obligation};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn movement(cents: i64, date: (i32, u32, u32), text: &str) -> Movement {
        Movement::new(
            AccountId::new(),
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            Money::from_cents(cents),
            text,
            BatchId::new(),
            0,
        )
    }

    fn obligation(kind: ObligationKind, cents: i64, date: (i32, u32, u32), text: &str) -> Obligation {
        Obligation::new(
            kind,
            text,
            Money::from_cents(cents),
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        )
    }

    #[test]
    fn test_sign_routing() {
        let (_temp, storage) = fixture();

        let income = obligation(ObligationKind::Income, 250000, (2024, 1, 25), "Acme payroll");
        let expense = obligation(ObligationKind::Expense, 250000, (2024, 1, 25), "Acme payroll");
        let income_id = income.id;
        storage.obligations.insert(income).unwrap();
        storage.obligations.insert(expense).unwrap();

        let inflow = movement(250000, (2024, 1, 25), "Acme payroll");
        let service = MatchingService::new(&storage);
        let candidates = service.candidates_for(&inflow).unwrap();

        // Only the income obligation is considered for an inflow
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].obligation_id, income_id);
        assert_eq!(candidates[0].kind, ObligationKind::Income);
    }

    #[test]
    fn test_outflow_sees_expense_and_capex() {
        let (_temp, storage) = fixture();

        storage
            .obligations
            .insert(obligation(ObligationKind::Expense, 50000, (2024, 1, 15), "Office rent"))
            .unwrap();
        storage
            .obligations
            .insert(obligation(ObligationKind::Capex, 50000, (2024, 1, 15), "Office rent"))
            .unwrap();
        storage
            .obligations
            .insert(obligation(ObligationKind::Income, 50000, (2024, 1, 15), "Office rent"))
            .unwrap();

        let outflow = movement(-50000, (2024, 1, 15), "Office rent");
        let service = MatchingService::new(&storage);
        let candidates = service.candidates_for(&outflow).unwrap();

        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|c| c.kind != ObligationKind::Income));
    }

    #[test]
    fn test_settled_obligations_not_considered() {
        let (_temp, storage) = fixture();

        let mut settled = obligation(ObligationKind::Expense, 50000, (2024, 1, 15), "Rent");
        settled.settle_out_of_band("cash", NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), None);
        storage.obligations.insert(settled).unwrap();

        let outflow = movement(-50000, (2024, 1, 15), "Rent");
        let service = MatchingService::new(&storage);
        assert!(service.candidates_for(&outflow).unwrap().is_empty());
    }

    #[test]
    fn test_candidates_sorted_by_confidence() {
        let (_temp, storage) = fixture();

        let strong = obligation(ObligationKind::Expense, 120000, (2024, 1, 15), "John Doe rent");
        let weak = obligation(ObligationKind::Expense, 120000, (2024, 3, 20), "Utility power");
        let strong_id = strong.id;
        storage.obligations.insert(weak).unwrap();
        storage.obligations.insert(strong).unwrap();

        let m = movement(-120000, (2024, 1, 15), "John Doe rent");
        let service = MatchingService::new(&storage);
        let candidates = service.candidates_for(&m).unwrap();

        assert!(candidates.len() >= 2);
        assert_eq!(candidates[0].obligation_id, strong_id);
        assert!(candidates[0].confidence > candidates[1].confidence);
    }

    #[test]
    fn test_ties_break_by_obligation_id() {
        let (_temp, storage) = fixture();

        let a = obligation(ObligationKind::Expense, 120000, (2024, 1, 15), "John Doe rent");
        let b = obligation(ObligationKind::Expense, 120000, (2024, 1, 15), "John Doe rent");
        let mut ids = [a.id, b.id];
        ids.sort();
        storage.obligations.insert(a).unwrap();
        storage.obligations.insert(b).unwrap();

        let m = movement(-120000, (2024, 1, 15), "John Doe rent");
        let service = MatchingService::new(&storage);
        let candidates = service.candidates_for(&m).unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].confidence, candidates[1].confidence);
        assert_eq!(candidates[0].obligation_id, ids[0]);
        assert_eq!(candidates[1].obligation_id, ids[1]);
    }

    #[test]
    fn test_sweep_covers_unreconciled_movements_only() {
        let (_temp, storage) = fixture();

        let open = movement(-120000, (2024, 1, 15), "Rent");
        let mut linked = movement(-5000, (2024, 1, 16), "Groceries");
        linked.link_obligation(ObligationKind::Expense, ObligationId::new());
        let open_id = open.id;
        storage.movements.insert(open).unwrap();
        storage.movements.insert(linked).unwrap();

        let service = MatchingService::new(&storage);
        let results = service.find_reconciliation_candidates().unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].movement_id, open_id);
        // No obligations seeded, so the list is present but empty
        assert!(results[0].candidates.is_empty());
    }
}
