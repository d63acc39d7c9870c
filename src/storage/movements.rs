//! Movement repository for JSON storage
//!
//! Manages loading and saving movements to movements.json. Keeps a
//! `(account_id, value_date)` index so the duplicate guard can look up
//! collision candidates without scanning the whole ledger.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::LedgerError;
use crate::models::{AccountId, BatchId, Movement, MovementId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable movement data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct MovementData {
    movements: Vec<Movement>,
}

/// Repository for movement persistence with indexing
///
/// Movements are insert-only: there is deliberately no delete method.
/// Duplicates are rejected before creation, never cleaned up after.
pub struct MovementRepository {
    path: PathBuf,
    data: RwLock<HashMap<MovementId, Movement>>,
    /// Index: (account_id, value_date) -> movement_ids
    by_account_date: RwLock<HashMap<(AccountId, NaiveDate), Vec<MovementId>>>,
    /// Index: batch_id -> movement_ids
    by_batch: RwLock<HashMap<BatchId, Vec<MovementId>>>,
}

impl MovementRepository {
    /// Create a new movement repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_account_date: RwLock::new(HashMap::new()),
            by_batch: RwLock::new(HashMap::new()),
        }
    }

    /// Load movements from disk and build indexes
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: MovementData = read_json(&self.path)?;

        let mut data = self.write_data()?;
        let mut by_account_date = self.write_index(&self.by_account_date)?;
        let mut by_batch = self.write_index(&self.by_batch)?;

        data.clear();
        by_account_date.clear();
        by_batch.clear();

        for movement in file_data.movements {
            let id = movement.id;
            by_account_date
                .entry((movement.account_id, movement.date))
                .or_default()
                .push(id);
            by_batch.entry(movement.batch_id).or_default().push(id);
            data.insert(id, movement);
        }

        Ok(())
    }

    /// Save movements to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let data = self.read_data()?;

        let mut movements: Vec<_> = data.values().cloned().collect();
        movements.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        let file_data = MovementData { movements };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a movement by ID
    pub fn get(&self, id: MovementId) -> Result<Option<Movement>, LedgerError> {
        Ok(self.read_data()?.get(&id).cloned())
    }

    /// Get all movements, newest first
    pub fn get_all(&self) -> Result<Vec<Movement>, LedgerError> {
        let data = self.read_data()?;
        let mut movements: Vec<_> = data.values().cloned().collect();
        movements.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(movements)
    }

    /// Get all currently unreconciled movements, ordered by id for
    /// deterministic matching sweeps
    pub fn get_unreconciled(&self) -> Result<Vec<Movement>, LedgerError> {
        let data = self.read_data()?;
        let mut movements: Vec<_> = data
            .values()
            .filter(|m| m.is_unreconciled())
            .cloned()
            .collect();
        movements.sort_by_key(|m| m.id);
        Ok(movements)
    }

    /// Get movements for an account on a specific value date.
    /// This is the duplicate guard's lookup path.
    pub fn get_on_date(
        &self,
        account_id: AccountId,
        date: NaiveDate,
    ) -> Result<Vec<Movement>, LedgerError> {
        let data = self.read_data()?;
        let index = self.read_index(&self.by_account_date)?;

        let ids = index
            .get(&(account_id, date))
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        Ok(ids.iter().filter_map(|id| data.get(id).cloned()).collect())
    }

    /// Get the movements created by one import batch
    pub fn get_by_batch(&self, batch_id: BatchId) -> Result<Vec<Movement>, LedgerError> {
        let data = self.read_data()?;
        let index = self.read_index(&self.by_batch)?;

        let ids = index
            .get(&batch_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        let mut movements: Vec<_> =
            ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        movements.sort_by_key(|m| m.source_row_index);
        Ok(movements)
    }

    /// Insert a new movement
    ///
    /// Fails if a movement with the same id already exists.
    pub fn insert(&self, movement: Movement) -> Result<(), LedgerError> {
        let mut data = self.write_data()?;
        if data.contains_key(&movement.id) {
            return Err(LedgerError::Storage(format!(
                "Movement already exists: {}",
                movement.id
            )));
        }

        let mut by_account_date = self.write_index(&self.by_account_date)?;
        let mut by_batch = self.write_index(&self.by_batch)?;

        by_account_date
            .entry((movement.account_id, movement.date))
            .or_default()
            .push(movement.id);
        by_batch
            .entry(movement.batch_id)
            .or_default()
            .push(movement.id);
        data.insert(movement.id, movement);
        Ok(())
    }

    /// Update a movement with optimistic version checking
    ///
    /// `movement.version` must equal the stored version; on success the
    /// stored copy gets `version + 1`. A mismatch means a concurrent writer
    /// got there first and the update is rejected with `StaleVersion`.
    pub fn update_versioned(&self, mut movement: Movement) -> Result<Movement, LedgerError> {
        let mut data = self.write_data()?;

        let stored = data
            .get(&movement.id)
            .ok_or_else(|| LedgerError::movement_not_found(movement.id.to_string()))?;

        if stored.version != movement.version {
            return Err(LedgerError::StaleVersion {
                entity_type: "Movement",
                identifier: movement.id.to_string(),
                expected: movement.version,
                found: stored.version,
            });
        }

        movement.version += 1;
        data.insert(movement.id, movement.clone());
        Ok(movement)
    }

    /// Count movements
    pub fn count(&self) -> Result<usize, LedgerError> {
        Ok(self.read_data()?.len())
    }

    fn read_data(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<MovementId, Movement>>, LedgerError> {
        self.data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_data(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<MovementId, Movement>>, LedgerError> {
        self.data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    fn read_index<'a, K, V>(
        &self,
        index: &'a RwLock<HashMap<K, V>>,
    ) -> Result<std::sync::RwLockReadGuard<'a, HashMap<K, V>>, LedgerError> {
        index
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_index<'a, K, V>(
        &self,
        index: &'a RwLock<HashMap<K, V>>,
    ) -> Result<std::sync::RwLockWriteGuard<'a, HashMap<K, V>>, LedgerError> {
        index
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, MovementRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("movements.json");
        let repo = MovementRepository::new(path);
        (temp_dir, repo)
    }

    fn test_movement(account_id: AccountId, date: NaiveDate, cents: i64) -> Movement {
        Movement::new(
            account_id,
            date,
            Money::from_cents(cents),
            "Test movement",
            BatchId::new(),
            0,
        )
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let account_id = AccountId::new();
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let movement = test_movement(account_id, date, -5000);
        let id = movement.id;

        repo.insert(movement).unwrap();

        let retrieved = repo.get(id).unwrap().unwrap();
        assert_eq!(retrieved.amount.cents(), -5000);
    }

    #[test]
    fn test_double_insert_rejected() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let movement = test_movement(
            AccountId::new(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            -5000,
        );
        repo.insert(movement.clone()).unwrap();
        assert!(repo.insert(movement).is_err());
    }

    #[test]
    fn test_get_on_date_uses_index() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let account1 = AccountId::new();
        let account2 = AccountId::new();
        let date1 = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let date2 = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();

        repo.insert(test_movement(account1, date1, -100)).unwrap();
        repo.insert(test_movement(account1, date1, -200)).unwrap();
        repo.insert(test_movement(account1, date2, -300)).unwrap();
        repo.insert(test_movement(account2, date1, -400)).unwrap();

        assert_eq!(repo.get_on_date(account1, date1).unwrap().len(), 2);
        assert_eq!(repo.get_on_date(account1, date2).unwrap().len(), 1);
        assert_eq!(repo.get_on_date(account2, date2).unwrap().len(), 0);
    }

    #[test]
    fn test_get_by_batch_ordered_by_row() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let account_id = AccountId::new();
        let batch_id = BatchId::new();
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        for idx in [2usize, 0, 1] {
            let m = Movement::new(
                account_id,
                date,
                Money::from_cents(-100 - idx as i64),
                format!("row {}", idx),
                batch_id,
                idx,
            );
            repo.insert(m).unwrap();
        }

        let batch = repo.get_by_batch(batch_id).unwrap();
        let rows: Vec<_> = batch.iter().map(|m| m.source_row_index).collect();
        assert_eq!(rows, vec![0, 1, 2]);
    }

    #[test]
    fn test_update_versioned_happy_path() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let movement = test_movement(
            AccountId::new(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            -5000,
        );
        let id = movement.id;
        repo.insert(movement).unwrap();

        let mut read = repo.get(id).unwrap().unwrap();
        read.description = "updated".into();
        let updated = repo.update_versioned(read).unwrap();
        assert_eq!(updated.version, 1);

        let stored = repo.get(id).unwrap().unwrap();
        assert_eq!(stored.description, "updated");
        assert_eq!(stored.version, 1);
    }

    #[test]
    fn test_update_versioned_conflict() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let movement = test_movement(
            AccountId::new(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            -5000,
        );
        let id = movement.id;
        repo.insert(movement).unwrap();

        // Two writers read the same version
        let first = repo.get(id).unwrap().unwrap();
        let second = repo.get(id).unwrap().unwrap();

        repo.update_versioned(first).unwrap();
        let err = repo.update_versioned(second).unwrap_err();
        assert!(matches!(err, LedgerError::StaleVersion { .. }));
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let movement = test_movement(
            AccountId::new(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            -5000,
        );
        let id = movement.id;

        repo.insert(movement).unwrap();
        repo.save().unwrap();

        let path = temp_dir.path().join("movements.json");
        let repo2 = MovementRepository::new(path);
        repo2.load().unwrap();

        assert_eq!(repo2.count().unwrap(), 1);
        assert_eq!(repo2.get(id).unwrap().unwrap().amount.cents(), -5000);
    }

    #[test]
    fn test_get_unreconciled_is_deterministic() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let account_id = AccountId::new();
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        for i in 0..5 {
            repo.insert(test_movement(account_id, date, -100 - i)).unwrap();
        }

        let first: Vec<_> = repo
            .get_unreconciled()
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        let second: Vec<_> = repo
            .get_unreconciled()
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(first, second);
    }
}
