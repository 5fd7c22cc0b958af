//! TreeColumnStore
//!
//! Adapts [`ColumnTree`] to the [`ColumnStore`] contract: one tree per key.
//!
//! Ordered reads come straight from in-order traversal. Writes pay the tree
//! descent, which degrades to O(n) when columns arrive in sorted order.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::config::{Backend, LogSyncStrategy};
use crate::error::Result;
use crate::oplog::{Mutation, OperationLog};
use crate::tree::ColumnTree;
use super::{check_slice_bounds, column_not_found, key_not_found, ColumnStore, ColumnValue};

/// Column store backed by a binary search tree per key
#[derive(Default)]
pub struct TreeColumnStore {
    keys: HashMap<String, ColumnTree>,

    /// Attached log; `None` means no persistence
    oplog: Option<OperationLog>,
}

impl TreeColumnStore {
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

    /// The column tree holding `key`, if present
    pub fn tree(&self, key: &str) -> Option<&ColumnTree> {
        self.keys.get(key)
    }
}

impl ColumnStore for TreeColumnStore {
    fn backend(&self) -> Backend {
        Backend::Tree
    }

    fn get(&self, key: &str, column: &str) -> Option<&str> {
        self.keys.get(key).and_then(|tree| tree.get(column))
    }

    fn get_key(&self, key: &str) -> Vec<ColumnValue> {
        self.keys.get(key).map(ColumnTree::entries).unwrap_or_default()
    }

    fn get_keys(&self) -> HashSet<String> {
        self.keys.keys().cloned().collect()
    }

    fn get_slice(&self, key: &str, start: Option<&str>, end: Option<&str>) -> Result<Vec<ColumnValue>> {
        check_slice_bounds(start, end)?;

        let Some(tree) = self.keys.get(key) else {
            return Ok(Vec::new());
        };

        Ok(tree
            .range(start, end)
            .map(|(column, value)| (column.to_string(), value.to_string()))
            .collect())
    }

    fn contains_key(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    fn column_count(&self, key: &str) -> usize {
        self.keys.get(key).map_or(0, ColumnTree::len)
    }

    fn len(&self) -> usize {
        self.keys.values().map(ColumnTree::len).sum()
    }

    fn apply(&mut self, mutation: Mutation) -> Result<()> {
        match mutation {
            Mutation::Set { key, column, value } => {
                self.keys.entry(key).or_default().insert(column, value);
            }
            Mutation::Delete { key, column } => {
                let tree = self.keys.get_mut(&key).ok_or_else(|| key_not_found(&key))?;
                tree.remove(&column)
                    .ok_or_else(|| column_not_found(&key, &column))?;

                if tree.is_empty() {
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
