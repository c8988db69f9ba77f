//! Durable, ordered record store
//!
//! `RecordStore` is the only place records are mutated. Every mutation
//! serializes the new sequence and writes it through the injected
//! [`Storage`] before the in-memory snapshot is swapped, so a failed write
//! leaves both copies at the previous state.

mod storage;

pub use storage::{FileStorage, MemoryStorage, Storage};

use crate::error::PayrollResult;
use crate::types::{EmployeeRecord, GridRow};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Durable key for the employee register
pub const EMPLOYEES_KEY: &str = "employees";

/// Durable key for the raw spreadsheet grid
pub const GRID_KEY: &str = "excel_data";

/// Store of typed employee records
pub type EmployeeStore<S> = RecordStore<EmployeeRecord, S>;

/// Store of raw grid rows
pub type GridStore<S> = RecordStore<GridRow, S>;

/// Ordered records persisted as a JSON array under one storage key
pub struct RecordStore<T, S> {
    storage: S,
    key: String,
    records: Arc<[T]>,
}

impl<T, S> RecordStore<T, S>
where
    T: Serialize + DeserializeOwned + Clone,
    S: Storage,
{
    /// Open the store and load whatever the durable copy holds
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let mut store = Self {
            storage,
            key: key.into(),
            records: Arc::from(Vec::new()),
        };
        store.records = Arc::from(store.load());
        store
    }

    /// Read the durable copy.
    ///
    /// Fails soft: an absent, unreadable or unparsable copy yields an
    /// empty sequence.
    pub fn load(&self) -> Vec<T> {
        let raw = match self.storage.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "no durable copy, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "durable copy unreadable, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(key = %self.key, error = %e, "durable copy unparsable, starting empty");
                Vec::new()
            }
        }
    }

    /// Current records, in order
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Immutable snapshot of the current records
    pub fn snapshot(&self) -> Arc<[T]> {
        Arc::clone(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Discard the current sequence and persist `records` in its place
    pub fn replace_all(&mut self, records: Vec<T>) -> PayrollResult<()> {
        self.commit(records)
    }

    /// Add one record at the end
    pub fn append(&mut self, record: T) -> PayrollResult<()> {
        let mut next = self.records.to_vec();
        next.push(record);
        self.commit(next)
    }

    /// Empty the store and delete the durable key
    pub fn clear(&mut self) -> PayrollResult<()> {
        self.storage.remove(&self.key)?;
        self.records = Arc::from(Vec::new());
        Ok(())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn commit(&mut self, records: Vec<T>) -> PayrollResult<()> {
        let json = serde_json::to_string(&records)?;
        self.storage.write(&self.key, &json)?;
        self.records = Arc::from(records);
        Ok(())
    }
}
