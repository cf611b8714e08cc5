//! The record-store seam.
//!
//! [`RecordStore`] is implemented by the CSV store in `uxstudy-storage` and
//! by [`MemoryStore`] here, which lets the validator and aggregator be tested
//! without touching a filesystem.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::StoreError;
use crate::model::{Dataset, Row};

/// Append-only storage for the four datasets.
pub trait RecordStore: Send + Sync {
    /// Append one row to `dataset`, creating it (header first) if missing.
    fn append(&self, dataset: Dataset, row: &Row) -> Result<(), StoreError>;

    /// All rows of `dataset` in insertion order. A missing dataset is empty.
    fn load(&self, dataset: Dataset) -> Result<Vec<Row>, StoreError>;

    /// Number of rows in `dataset`.
    fn count(&self, dataset: Dataset) -> Result<usize, StoreError> {
        Ok(self.load(dataset)?.len())
    }
}

/// In-memory store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    datasets: Mutex<HashMap<Dataset, Vec<Row>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing rows.
    pub fn with_rows(dataset: Dataset, rows: Vec<Row>) -> Self {
        let store = Self::new();
        store.lock().insert(dataset, rows);
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Dataset, Vec<Row>>> {
        // A poisoned map still holds whole rows; keep using it.
        self.datasets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RecordStore for MemoryStore {
    fn append(&self, dataset: Dataset, row: &Row) -> Result<(), StoreError> {
        self.lock().entry(dataset).or_default().push(row.clone());
        tracing::debug!(%dataset, "appended row to memory store");
        Ok(())
    }

    fn load(&self, dataset: Dataset) -> Result<Vec<Row>, StoreError> {
        Ok(self.lock().get(&dataset).cloned().unwrap_or_default())
    }
}
