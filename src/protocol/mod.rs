//! Protocol Module
//!
//! The request/response vocabulary the engine executes and the CLI speaks.
//!
//! ### Commands
//! - `set`        - key, column, value
//! - `get`        - key, column
//! - `get_key`    - key
//! - `get_keys`   - (none)
//! - `delete`     - key, column
//! - `delete_key` - key
//! - `get_slice`  - key, optional start, optional end
//!
//! ### Responses
//! - `done`    - mutation applied
//! - `value`   - value or null
//! - `columns` - ordered [column, value] pairs
//! - `keys`    - sorted key list

mod command;
mod response;

pub use command::Command;
pub use response::Response;
