//! Obligation repository for JSON storage
//!
//! The three obligation kinds (income, expense, capex) are logically three
//! tables; they share one repository keyed by `(kind, id)` with a per-kind
//! index, which keeps the 1:1 link bookkeeping in one place.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{Obligation, ObligationId, ObligationKind};

use super::file_io::{read_json, write_json_atomic};

/// Serializable obligation data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ObligationData {
    obligations: Vec<Obligation>,
}

/// Repository for obligation persistence
pub struct ObligationRepository {
    path: PathBuf,
    data: RwLock<HashMap<ObligationId, Obligation>>,
    /// Index: kind -> obligation_ids
    by_kind: RwLock<HashMap<ObligationKind, Vec<ObligationId>>>,
}

impl ObligationRepository {
    /// Create a new obligation repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_kind: RwLock::new(HashMap::new()),
        }
    }

    /// Load obligations from disk and build the kind index
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: ObligationData = read_json(&self.path)?;

        let mut data = self.write_data()?;
        let mut by_kind = self
            .by_kind
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_kind.clear();

        for obligation in file_data.obligations {
            by_kind
                .entry(obligation.kind)
                .or_default()
                .push(obligation.id);
            data.insert(obligation.id, obligation);
        }

        Ok(())
    }

    /// Save obligations to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let data = self.read_data()?;

        let mut obligations: Vec<_> = data.values().cloned().collect();
        obligations.sort_by(|a, b| {
            a.expected_date
                .cmp(&b.expected_date)
                .then(a.id.cmp(&b.id))
        });

        let file_data = ObligationData { obligations };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get an obligation by kind and ID
    ///
    /// The kind acts as a table selector: an id stored under a different
    /// kind is not found.
    pub fn get(
        &self,
        kind: ObligationKind,
        id: ObligationId,
    ) -> Result<Option<Obligation>, LedgerError> {
        let data = self.read_data()?;
        Ok(data.get(&id).filter(|o| o.kind == kind).cloned())
    }

    /// Get all obligations of one kind
    pub fn get_by_kind(&self, kind: ObligationKind) -> Result<Vec<Obligation>, LedgerError> {
        let data = self.read_data()?;
        let by_kind = self
            .by_kind
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_kind.get(&kind).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut obligations: Vec<_> =
            ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        obligations.sort_by_key(|o| o.id);
        Ok(obligations)
    }

    /// Get all outstanding (Forecast) obligations of one kind,
    /// ordered by id for deterministic matching
    pub fn get_forecast_by_kind(
        &self,
        kind: ObligationKind,
    ) -> Result<Vec<Obligation>, LedgerError> {
        Ok(self
            .get_by_kind(kind)?
            .into_iter()
            .filter(|o| o.is_forecast())
            .collect())
    }

    /// Insert a new obligation
    pub fn insert(&self, obligation: Obligation) -> Result<(), LedgerError> {
        let mut data = self.write_data()?;
        if data.contains_key(&obligation.id) {
            return Err(LedgerError::Storage(format!(
                "Obligation already exists: {}",
                obligation.id
            )));
        }

        let mut by_kind = self
            .by_kind
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        by_kind
            .entry(obligation.kind)
            .or_default()
            .push(obligation.id);
        data.insert(obligation.id, obligation);
        Ok(())
    }

    /// Update an obligation with optimistic version checking
    ///
    /// `obligation.version` must equal the stored version; on success the
    /// stored copy gets `version + 1`. A mismatch is a lost race and is
    /// rejected with `StaleVersion`.
    pub fn update_versioned(&self, mut obligation: Obligation) -> Result<Obligation, LedgerError> {
        let mut data = self.write_data()?;

        let stored = data
            .get(&obligation.id)
            .ok_or_else(|| LedgerError::obligation_not_found(obligation.id.to_string()))?;

        if stored.version != obligation.version {
            return Err(LedgerError::StaleVersion {
                entity_type: "Obligation",
                identifier: obligation.id.to_string(),
                expected: obligation.version,
                found: stored.version,
            });
        }

        obligation.version += 1;
        data.insert(obligation.id, obligation.clone());
        Ok(obligation)
    }

    /// Count obligations
    pub fn count(&self) -> Result<usize, LedgerError> {
        Ok(self.read_data()?.len())
    }

    fn read_data(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<ObligationId, Obligation>>, LedgerError>
    {
        self.data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_data(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<ObligationId, Obligation>>, LedgerError>
    {
        self.data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}
