use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};
use crate::utils::{commit_bytes, ensure_dir};

const CONFIG_FILE: &str = "config.json";
const APP_DIR: &str = "expense_core";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub currency: String,
    pub database_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "USD".into(),
            database_file: "ledger.db".into(),
            last_export_dir: None,
        }
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    /// Manager rooted at the platform data directory.
    pub fn new() -> Result<Self> {
        let base = dirs::data_dir()
            .ok_or_else(|| LedgerError::Storage("no platform data directory".into()))?
            .join(APP_DIR);
        Self::with_base_dir(base)
    }

    /// Manager rooted at an explicit directory; used by tests and overrides.
    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        let path = base.join(CONFIG_FILE);
        Ok(Self { base, path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    /// Absolute path of the ledger database named by `config`.
    pub fn database_path(&self, config: &Config) -> PathBuf {
        self.base.join(&config.database_file)
    }

    /// Loads the stored configuration, or defaults when none exists yet.
    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        commit_bytes(&self.path, json.as_bytes())?;
        Ok(())
    }
}
