//! Account repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{Account, AccountId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable account data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct AccountData {
    accounts: Vec<Account>,
}

/// Repository for account persistence
pub struct AccountRepository {
    path: PathBuf,
    data: RwLock<HashMap<AccountId, Account>>,
}

impl AccountRepository {
    /// Create a new account repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load accounts from disk
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: AccountData = read_json(&self.path)?;

        let mut data = self.write_data()?;
        data.clear();
        for account in file_data.accounts {
            data.insert(account.id, account);
        }
        Ok(())
    }

    /// Save accounts to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let data = self.read_data()?;

        let mut accounts: Vec<_> = data.values().cloned().collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name));

        let file_data = AccountData { accounts };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get an account by ID
    pub fn get(&self, id: AccountId) -> Result<Option<Account>, LedgerError> {
        Ok(self.read_data()?.get(&id).cloned())
    }

    /// Get all accounts
    pub fn get_all(&self) -> Result<Vec<Account>, LedgerError> {
        let data = self.read_data()?;
        let mut accounts: Vec<_> = data.values().cloned().collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(accounts)
    }

    /// Check whether an account exists and is not archived.
    /// This is the ingestor's mandatory per-row account check.
    pub fn exists_active(&self, id: AccountId) -> Result<bool, LedgerError> {
        Ok(self
            .read_data()?
            .get(&id)
            .map(|a| !a.archived)
            .unwrap_or(false))
    }

    /// Find accounts whose IBAN matches the detected one
    pub fn find_by_iban(&self, detected_iban: &str) -> Result<Vec<Account>, LedgerError> {
        let data = self.read_data()?;
        let mut matches: Vec<_> = data
            .values()
            .filter(|a| a.iban_matches(detected_iban))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matches)
    }

    /// Insert or update an account
    pub fn upsert(&self, account: Account) -> Result<(), LedgerError> {
        let mut data = self.write_data()?;
        data.insert(account.id, account);
        Ok(())
    }

    /// Count accounts
    pub fn count(&self) -> Result<usize, LedgerError> {
        Ok(self.read_data()?.len())
    }

    fn read_data(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<AccountId, Account>>, LedgerError> {
        self.data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_data(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<AccountId, Account>>, LedgerError> {
        self.data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}
