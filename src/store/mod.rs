//! Store Module
//!
//! The key -> ordered column/value contract and its two backends.
//!
//! ## Responsibilities
//! - Point lookup of a single column
//! - Ordered reads of a whole key or an inclusive column slice
//! - Mutations routed "validate, write to log, apply in memory, sync log"
//!
//! ## Backends
//! - [`HashColumnStore`]: O(1) average point access, sorts on ordered reads
//! - [`TreeColumnStore`]: unbalanced BST per key, ordered reads without sorting
//!
//! ## Policies
//! - `delete` / `delete_key` on a missing key, or `delete` of a missing
//!   column, is an error and is never logged
//! - Deleting a key's last column removes the key
//! - `get_slice` with `start > end` is an error

mod hash;
mod tree;

pub use hash::HashColumnStore;
pub use tree::TreeColumnStore;

use std::collections::HashSet;

use crate::config::Backend;
use crate::error::{KcvError, Result};
use crate::oplog::{Mutation, OperationLog};

/// An ordered (column, value) pair
pub type ColumnValue = (String, String);

/// Key -> ordered column/value store
pub trait ColumnStore {
    /// Which implementation this is
    fn backend(&self) -> Backend;

    /// Value at `key`/`column`, or `None` if either is absent
    fn get(&self, key: &str, column: &str) -> Option<&str>;

    /// All columns of `key` in ascending column order (empty if absent)
    fn get_key(&self, key: &str) -> Vec<ColumnValue>;

    /// Every key holding at least one column
    fn get_keys(&self) -> HashSet<String>;

    /// Columns of `key` with `start <= column <= end`, ascending
    ///
    /// `None` leaves that side open. A missing key yields an empty slice.
    fn get_slice(&self, key: &str, start: Option<&str>, end: Option<&str>) -> Result<Vec<ColumnValue>>;

    fn contains_key(&self, key: &str) -> bool;

    /// Number of columns under `key`
    fn column_count(&self, key: &str) -> usize;

    /// Total number of columns across all keys
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply a mutation in memory only, bypassing the log
    ///
    /// Used by replay. Callers that want persistence go through
    /// [`ColumnStore::execute`].
    fn apply(&mut self, mutation: Mutation) -> Result<()>;

    fn oplog(&self) -> Option<&OperationLog>;

    fn oplog_mut(&mut self) -> Option<&mut OperationLog>;

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Insert or overwrite a column
    fn set(&mut self, key: &str, column: &str, value: &str) -> Result<()> {
        self.execute(Mutation::set(key, column, value))
    }

    /// Remove one column from a key
    fn delete(&mut self, key: &str, column: &str) -> Result<()> {
        self.execute(Mutation::delete(key, column))
    }

    /// Remove a key and all of its columns
    fn delete_key(&mut self, key: &str) -> Result<()> {
        self.execute(Mutation::delete_key(key))
    }

    /// Run a mutation
    ///
    /// Steps:
    /// 1. Validate against current state
    /// 2. Write to the log, if one is attached
    /// 3. Apply in memory
    /// 4. Sync the log, if the strategy calls for it
    ///
    /// Once the record is written the mutation is applied, even if the sync
    /// then fails.
    fn execute(&mut self, mutation: Mutation) -> Result<()> {
        self.check(&mutation)?;

        if let Some(oplog) = self.oplog_mut() {
            oplog.write(&mutation)?;
        }

        self.apply(mutation)?;

        match self.oplog_mut() {
            Some(oplog) => oplog.sync_if_due(),
            None => Ok(()),
        }
    }

    /// Check that a mutation can be applied to the current state
    fn check(&self, mutation: &Mutation) -> Result<()> {
        match mutation {
            Mutation::Set { .. } => Ok(()),
            Mutation::Delete { key, column } => {
                if !self.contains_key(key) {
                    Err(key_not_found(key))
                } else if self.get(key, column).is_none() {
                    Err(column_not_found(key, column))
                } else {
                    Ok(())
                }
            }
            Mutation::DeleteKey { key } => {
                if self.contains_key(key) {
                    Ok(())
                } else {
                    Err(key_not_found(key))
                }
            }
        }
    }

    // =========================================================================
    // Log lifecycle
    // =========================================================================

    /// Force the attached log to disk
    ///
    /// Asking for durability on a store without a log is a caller bug and
    /// fails with [`KcvError::LogNotAttached`].
    fn sync_log(&mut self) -> Result<()> {
        self.oplog_mut().ok_or(KcvError::LogNotAttached)?.sync()
    }

    /// Flush the attached log, if any, for a controlled shutdown
    fn close(&mut self) -> Result<()> {
        match self.oplog_mut() {
            Some(oplog) => oplog.sync(),
            None => Ok(()),
        }
    }
}

/// Reject inverted slice bounds
pub(crate) fn check_slice_bounds(start: Option<&str>, end: Option<&str>) -> Result<()> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => Err(KcvError::InvalidSlice {
            start: start.to_string(),
            end: end.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Error for a mutation that targets a missing key
pub(crate) fn key_not_found(key: &str) -> KcvError {
    KcvError::KeyNotFound(key.to_string())
}

/// Error for a delete of a missing column
pub(crate) fn column_not_found(key: &str, column: &str) -> KcvError {
    KcvError::ColumnNotFound {
        key: key.to_string(),
        column: column.to_string(),
    }
}
