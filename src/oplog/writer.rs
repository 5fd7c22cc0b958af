//! Operation log writer
//!
//! Handles appending records to the log file.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::config::LogSyncStrategy;
use crate::error::Result;
use super::{Mutation, TERMINATOR};

/// Appends records to the log file
///
/// Each record is written with one blocking `write_all` on the calling thread;
/// nothing is buffered in user space. The sync strategy only decides when
/// the data is additionally forced to disk.
pub struct LogWriter {
    file: File,
    path: PathBuf,
    sync_strategy: LogSyncStrategy,

    /// File length up to the end of the last complete record
    len: u64,

    /// Records appended through this writer
    appended: u64,

    /// Records written since the last fsync
    unsynced: usize,
}

impl LogWriter {
    /// Open or create a log file for appending
    ///
    /// If the file ends in an unterminated record (a write cut short by a
    /// crash), a terminator is added first so the next record starts on its
    /// own line.
    pub fn open(path: &Path, sync_strategy: LogSyncStrategy) -> Result<Self> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;

        let mut len = file.metadata()?.len();
        if len > 0 {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1))?;
            file.read_exact(&mut last)?;

            if last[0] != TERMINATOR as u8 {
                tracing::warn!(path = %path.display(), "terminating unfinished final record");
                file.write_all(&[TERMINATOR as u8])?;
                file.sync_data()?;
                len += 1;
            }
        }

        tracing::debug!(path = %path.display(), ?sync_strategy, "opened operation log for append");

        Ok(Self {
            file,
            path: path.to_path_buf(),
            sync_strategy,
            len,
            appended: 0,
            unsynced: 0,
        })
    }

    /// Append one record and sync it according to the strategy
    ///
    /// Returns the record's sequence number within this writer (starting
    /// at 1).
    pub fn append(&mut self, mutation: &Mutation) -> Result<u64> {
        let seq = self.write(mutation)?;
        self.sync_if_due()?;
        Ok(seq)
    }

    /// Write one record without syncing
    ///
    /// The record is encoded before anything is written, so an unloggable
    /// mutation leaves the file untouched. A write that fails partway is
    /// truncated back to the previous record boundary.
    pub fn write(&mut self, mutation: &Mutation) -> Result<u64> {
        let line = mutation.encode()?;

        if let Err(e) = self.file.write_all(line.as_bytes()) {
            if let Err(truncate_err) = self.file.set_len(self.len) {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %truncate_err,
                    "could not truncate partially written record"
                );
            }
            return Err(e.into());
        }

        self.len += line.len() as u64;
        self.appended += 1;
        self.unsynced += 1;

        tracing::trace!(seq = self.appended, op = %mutation.name(), "appended log record");

        Ok(self.appended)
    }

    /// Sync if the strategy calls for it given the records written so far
    pub fn sync_if_due(&mut self) -> Result<()> {
        if self.unsynced == 0 {
            return Ok(());
        }

        match self.sync_strategy {
            LogSyncStrategy::OsBuffered => Ok(()),
            LogSyncStrategy::EveryWrite => self.sync(),
            LogSyncStrategy::EveryNEntries { count } if self.unsynced >= count => self.sync(),
            LogSyncStrategy::EveryNEntries { .. } => Ok(()),
        }
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_data()?;
        self.unsynced = 0;
        Ok(())
    }

    /// Number of records appended through this writer
    pub fn appended(&self) -> u64 {
        self.appended
    }

    /// Records written but not yet forced to disk
    pub fn unsynced(&self) -> usize {
        self.unsynced
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sync_strategy(&self) -> LogSyncStrategy {
        self.sync_strategy
    }
}
