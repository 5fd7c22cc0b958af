//! Operation Log Module
//!
//! Provides durability through an append-only, line-oriented log of every
//! mutating store call.
//!
//! ## Responsibilities
//! - Append one record per mutation, before it is applied in memory
//! - Replay the log in file order to rebuild a store on startup
//! - Reject corrupt logs instead of skipping records
//!
//! ## File Format
//! ```text
//! set,<key>,<column>,<value>\n
//! delete,<key>,<column>\n
//! delete_key,<key>\n
//! ```
//!
//! There is no escaping. Arguments containing `,` or a line break are
//! refused at append time.

mod record;
mod writer;
mod reader;
mod replay;
mod log;

pub use record::{Mutation, OperationName, DELIMITER, TERMINATOR};
pub use writer::LogWriter;
pub use reader::LogReader;
pub use replay::{replay, verify, ReplayStats};
pub use log::OperationLog;
