//! OperationLog
//!
//! Ties replay-on-open and append-for-life together for one store.

use std::path::Path;

use crate::config::LogSyncStrategy;
use crate::error::Result;
use crate::store::ColumnStore;
use super::replay::{self, ReplayStats};
use super::{LogWriter, Mutation};

/// Durable, replayable record of every mutating call on a store
///
/// The file handle is acquired in [`OperationLog::open`] and held until the
/// log is closed or dropped.
pub struct OperationLog {
    writer: LogWriter,

    /// What was replayed when the log was opened
    replayed: ReplayStats,
}

impl OperationLog {
    /// Rehydrate `store` from the log at `path`, then open it for appending
    ///
    /// On startup:
    /// 1. If the file exists, replay its records into `store` in file order
    /// 2. Open (or create) the file in append mode
    ///
    /// A corrupt or unknown record fails the whole open.
    pub fn open<S>(path: &Path, sync_strategy: LogSyncStrategy, store: &mut S) -> Result<Self>
    where
        S: ColumnStore + ?Sized,
    {
        let replayed = if path.is_file() {
            tracing::debug!(path = %path.display(), "replaying operation log");
            let stats = replay::replay(path, store)?;
            tracing::info!(
                path = %path.display(),
                records = stats.records,
                sets = stats.sets,
                deletes = stats.deletes,
                delete_keys = stats.delete_keys,
                "operation log replayed"
            );
            stats
        } else {
            ReplayStats::default()
        };

        let writer = LogWriter::open(path, sync_strategy)?;

        Ok(Self { writer, replayed })
    }

    /// Parse a log file without applying it to any store
    pub fn verify(path: &Path) -> Result<ReplayStats> {
        replay::verify(path)
    }

    /// Append a mutation as one line and sync per the strategy
    pub fn append(&mut self, mutation: &Mutation) -> Result<u64> {
        self.writer.append(mutation)
    }

    /// Write a mutation as one line, leaving the sync to [`Self::sync_if_due`]
    pub fn write(&mut self, mutation: &Mutation) -> Result<u64> {
        self.writer.write(mutation)
    }

    /// Sync if the strategy calls for it
    pub fn sync_if_due(&mut self) -> Result<()> {
        self.writer.sync_if_due()
    }

    /// Force everything appended so far to disk
    pub fn sync(&mut self) -> Result<()> {
        self.writer.sync()
    }

    /// Sync and release the file handle
    pub fn close(mut self) -> Result<()> {
        self.writer.sync()?;
        tracing::debug!(
            path = %self.writer.path().display(),
            appended = self.writer.appended(),
            "operation log closed"
        );
        Ok(())
    }

    /// Statistics from the replay performed on open
    pub fn replay_stats(&self) -> ReplayStats {
        self.replayed
    }

    /// Records appended since the log was opened
    pub fn records_appended(&self) -> u64 {
        self.writer.appended()
    }

    pub fn path(&self) -> &Path {
        self.writer.path()
    }

    pub fn sync_strategy(&self) -> LogSyncStrategy {
        self.writer.sync_strategy()
    }
}
