//! Storage layer for ledgerlink
//!
//! Provides JSON file storage with atomic writes and automatic
//! directory creation.

pub mod accounts;
pub mod file_io;
pub mod init;
pub mod movements;
pub mod obligations;

pub use accounts::AccountRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use movements::MovementRepository;
pub use obligations::ObligationRepository;

use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: LedgerPaths,
    pub accounts: AccountRepository,
    pub movements: MovementRepository,
    pub obligations: ObligationRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: LedgerPaths) -> Result<Self, LedgerError> {
        // Ensure directories exist
        paths.ensure_directories()?;

        Ok(Self {
            accounts: AccountRepository::new(paths.accounts_file()),
            movements: MovementRepository::new(paths.movements_file()),
            obligations: ObligationRepository::new(paths.obligations_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), LedgerError> {
        self.accounts.load()?;
        self.movements.load()?;
        self.obligations.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), LedgerError> {
        self.accounts.save()?;
        self.movements.save()?;
        self.obligations.save()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }
}
