//! Storage initialization
//!
//! Handles first-run setup: directories, settings file, and empty data files.

use crate::config::paths::LedgerPaths;
use crate::config::settings::Settings;
use crate::error::LedgerError;

use super::Storage;

/// Initialize storage for a fresh installation
///
/// Creates directories, writes default settings, and persists empty
/// data files so later loads never hit a missing-file path.
pub fn initialize_storage(paths: &LedgerPaths) -> Result<(), LedgerError> {
    paths.ensure_directories()?;

    Settings::load_or_create(paths)?;

    let storage = Storage::new(paths.clone())?;
    if !paths.movements_file().exists() {
        storage.save_all()?;
    }

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &LedgerPaths) -> bool {
    !paths.is_initialized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));

        initialize_storage(&paths).unwrap();

        assert!(!needs_initialization(&paths));
        assert!(paths.settings_file().exists());
        assert!(paths.movements_file().exists());
        assert!(paths.data_dir().exists());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        initialize_storage(&paths).unwrap();

        let mut settings = Settings::load_or_create(&paths).unwrap();
        settings.demo_mode = true;
        settings.save(&paths).unwrap();

        initialize_storage(&paths).unwrap();

        let reloaded = Settings::load_or_create(&paths).unwrap();
        assert!(reloaded.demo_mode);
    }
}
