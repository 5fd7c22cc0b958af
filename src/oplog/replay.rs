//! Operation log replay
//!
//! Rebuilds a store by re-executing logged mutations in file order.

use std::path::Path;

use serde::Serialize;

use crate::error::{KcvError, Result};
use crate::store::ColumnStore;
use super::{LogReader, Mutation};

/// Outcome of a replay or verify pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplayStats {
    /// Total records read
    pub records: u64,

    /// `set` records
    pub sets: u64,

    /// `delete` records
    pub deletes: u64,

    /// `delete_key` records
    pub delete_keys: u64,
}

impl ReplayStats {
    fn record(&mut self, mutation: &Mutation) {
        self.records += 1;
        match mutation {
            Mutation::Set { .. } => self.sets += 1,
            Mutation::Delete { .. } => self.deletes += 1,
            Mutation::DeleteKey { .. } => self.delete_keys += 1,
        }
    }
}

/// Apply every record in the log at `path` to `store`
///
/// Records go through [`ColumnStore::apply`], so nothing is logged again.
/// The first record that fails to parse or apply aborts the replay; records
/// before it have already been applied.
pub fn replay<S>(path: &Path, store: &mut S) -> Result<ReplayStats>
where
    S: ColumnStore + ?Sized,
{
    let mut stats = ReplayStats::default();

    for record in LogReader::open(path)? {
        let (line, mutation) = record?;
        stats.record(&mutation);

        store.apply(mutation).map_err(|e| KcvError::ReplayFailed {
            line,
            source: Box::new(e),
        })?;
    }

    Ok(stats)
}

/// Parse every record in the log at `path` without applying anything
pub fn verify(path: &Path) -> Result<ReplayStats> {
    let mut stats = ReplayStats::default();

    for record in LogReader::open(path)? {
        let (_, mutation) = record?;
        stats.record(&mutation);
    }

    Ok(stats)
}
