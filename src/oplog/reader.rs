//! Operation log reader
//!
//! Handles reading records from the log file, in file order.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::error::{KcvError, Result};
use super::Mutation;

/// Reads records from a log file
pub struct LogReader {
    lines: Lines<BufReader<File>>,

    /// 1-based number of the last line read
    line: u64,
}

impl LogReader {
    /// Open a log file for reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
            line: 0,
        })
    }

    /// Read the next record along with its line number
    ///
    /// Returns `Ok(None)` at end of file. A line that does not parse fails
    /// with [`KcvError::ReplayFailed`] carrying its line number.
    pub fn next_record(&mut self) -> Result<Option<(u64, Mutation)>> {
        let Some(line) = self.lines.next() else {
            return Ok(None);
        };

        self.line += 1;
        let line_number = self.line;

        let line = line.map_err(|e| KcvError::ReplayFailed {
            line: line_number,
            source: Box::new(e.into()),
        })?;

        let mutation = Mutation::parse(&line).map_err(|e| KcvError::ReplayFailed {
            line: line_number,
            source: Box::new(e),
        })?;

        Ok(Some((line_number, mutation)))
    }

    /// Number of lines read so far
    pub fn lines_read(&self) -> u64 {
        self.line
    }
}

impl Iterator for LogReader {
    type Item = Result<(u64, Mutation)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}
