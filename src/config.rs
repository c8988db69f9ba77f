//! Runtime configuration

use crate::store::FileStorage;
use std::path::PathBuf;

/// Default directory for the durable copies
pub const DEFAULT_DATA_DIR: &str = ".payroll";

/// Where state lives and where generated files go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            out_dir: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    /// File-backed storage rooted at `data_dir`
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.data_dir)
    }
}
