//! Path management for the treasury dashboard
//!
//! ## Path Resolution Order
//!
//! 1. `TREASURY_DATA_DIR` environment variable (if set)
//! 2. The platform data directory from `directories::ProjectDirs`
//!    (`~/.local/share/treasury` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::{TreasuryError, TreasuryResult};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "TREASURY_DATA_DIR";

/// Every path the dashboard reads or writes
#[derive(Debug, Clone)]
pub struct TreasuryPaths {
    base_dir: PathBuf,
}

impl TreasuryPaths {
    /// Resolve the base directory from the environment or the platform default
    pub fn new() -> TreasuryResult<Self> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Use an explicit base directory (tests, `--data-dir`)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Ledger files live here
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn companies_file(&self) -> PathBuf {
        self.data_dir().join("companies.json")
    }

    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    /// Costs and revenues share one file
    pub fn entries_file(&self) -> PathBuf {
        self.data_dir().join("entries.json")
    }

    /// Create the base and data directories
    pub fn ensure_directories(&self) -> TreasuryResult<()> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| TreasuryError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| TreasuryError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Whether any settings were ever saved here
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> TreasuryResult<PathBuf> {
    ProjectDirs::from("", "", "treasury")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            TreasuryError::Config(format!(
                "Could not determine a home directory; set {}",
                DATA_DIR_ENV
            ))
        })
}
