use std::sync::Mutex;

use expense_core::{config::ConfigManager, store::LedgerStore};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated store and config manager backed by a unique directory.
pub fn setup_test_env() -> (LedgerStore, ConfigManager) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    let store = LedgerStore::open(&base.join("ledger.db")).expect("open ledger store");

    (store, config_manager)
}
