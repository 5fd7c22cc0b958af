//! HashColumnStore
//!
//! Nested hash maps: key -> (column -> value).
//!
//! Point reads and writes are O(1) on average. Ordered reads collect the
//! key's columns and sort them, O(n log n) per call. The expected workload has
//! far more point operations than range scans.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::config::{Backend, LogSyncStrategy};
use crate::error::Result;
use crate::oplog::{Mutation, OperationLog};
use super::{check_slice_bounds, column_not_found, key_not_found, ColumnStore, ColumnValue};

/// Column store backed by a hash map per key
#[derive(Default)]
pub struct HashColumnStore {
    keys: HashMap<String, HashMap<String, String>>,

    /// Attached log; `None` means no persistence
    oplog: Option<OperationLog>,
}

impl HashColumnStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store persisted to `path`, replaying any existing log
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, LogSyncStrategy::default())
    }

    /// Open a persisted store with an explicit log sync strategy
    pub fn open_with(path: impl AsRef<Path>, sync_strategy: LogSyncStrategy) -> Result<Self> {
        let mut store = Self::new();
        let oplog = OperationLog::open(path.as_ref(), sync_strategy, &mut store)?;
        store.oplog = Some(oplog);
        Ok(store)
    }
}

impl ColumnStore for HashColumnStore {
    fn backend(&self) -> Backend {
        Backend::Hash
    }

    fn get(&self, key: &str, column: &str) -> Option<&str> {
        self.keys
            .get(key)
            .and_then(|columns| columns.get(column))
            .map(String::as_str)
    }

    fn get_key(&self, key: &str) -> Vec<ColumnValue> {
        let Some(columns) = self.keys.get(key) else {
            return Vec::new();
        };

        let mut pairs: Vec<ColumnValue> = columns
            .iter()
            .map(|(column, value)| (column.clone(), value.clone()))
            .collect();

        // Columns are unique within a key
        pairs.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        pairs
    }

    fn get_keys(&self) -> HashSet<String> {
        self.keys.keys().cloned().collect()
    }

    fn get_slice(&self, key: &str, start: Option<&str>, end: Option<&str>) -> Result<Vec<ColumnValue>> {
        check_slice_bounds(start, end)?;

        let mut slice = Vec::new();
        for (column, value) in self.get_key(key) {
            if end.is_some_and(|end| column.as_str() > end) {
                break;
            }
            if start.map_or(true, |start| column.as_str() >= start) {
                slice.push((column, value));
            }
        }

        Ok(slice)
    }

    fn contains_key(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    fn column_count(&self, key: &str) -> usize {
        self.keys.get(key).map_or(0, HashMap::len)
    }

    fn len(&self) -> usize {
        self.keys.values().map(HashMap::len).sum()
    }

    fn apply(&mut self, mutation: Mutation) -> Result<()> {
        match mutation {
            Mutation::Set { key, column, value } => {
                self.keys.entry(key).or_default().insert(column, value);
            }
            Mutation::Delete { key, column } => {
                let columns = self.keys.get_mut(&key).ok_or_else(|| key_not_found(&key))?;
                columns
                    .remove(&column)
                    .ok_or_else(|| column_not_found(&key, &column))?;

                if columns.is_empty() {
                    self.keys.remove(&key);
                }
            }
            Mutation::DeleteKey { key } => {
                self.keys.remove(&key).ok_or_else(|| key_not_found(&key))?;
            }
        }
        Ok(())
    }

    fn oplog(&self) -> Option<&OperationLog> {
        self.oplog.as_ref()
    }

    fn oplog_mut(&mut self) -> Option<&mut OperationLog> {
        self.oplog.as_mut()
    }
}
