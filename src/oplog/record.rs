//! Operation log records
//!
//! Defines the mutations that are logged and their one-line text encoding.

use std::fmt;
use std::str::FromStr;

use crate::error::{KcvError, Result};

/// Separates the operation name and its arguments within a record
pub const DELIMITER: char = ',';

/// Terminates a record
pub const TERMINATOR: char = '\n';

/// Names of the operations that may appear in a log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationName {
    Set,
    Delete,
    DeleteKey,
}

impl OperationName {
    /// Every recognized operation
    pub const ALL: [OperationName; 3] = [
        OperationName::Set,
        OperationName::Delete,
        OperationName::DeleteKey,
    ];

    /// Name as written to the log
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationName::Set => "set",
            OperationName::Delete => "delete",
            OperationName::DeleteKey => "delete_key",
        }
    }

    /// Number of positional arguments the operation takes
    pub fn arity(&self) -> usize {
        match self {
            OperationName::Set => 3,
            OperationName::Delete => 2,
            OperationName::DeleteKey => 1,
        }
    }
}

impl FromStr for OperationName {
    type Err = KcvError;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == name)
            .ok_or_else(|| KcvError::UnknownOperation {
                name: name.to_string(),
            })
    }
}

impl fmt::Display for OperationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state-changing store call, as recorded in the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Insert or overwrite a column under a key
    Set {
        key: String,
        column: String,
        value: String,
    },

    /// Remove one column from a key
    Delete { key: String, column: String },

    /// Remove a key and all of its columns
    DeleteKey { key: String },
}

impl Mutation {
    pub fn set(key: impl Into<String>, column: impl Into<String>, value: impl Into<String>) -> Self {
        Mutation::Set {
            key: key.into(),
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn delete(key: impl Into<String>, column: impl Into<String>) -> Self {
        Mutation::Delete {
            key: key.into(),
            column: column.into(),
        }
    }

    pub fn delete_key(key: impl Into<String>) -> Self {
        Mutation::DeleteKey { key: key.into() }
    }

    /// The operation this mutation performs
    pub fn name(&self) -> OperationName {
        match self {
            Mutation::Set { .. } => OperationName::Set,
            Mutation::Delete { .. } => OperationName::Delete,
            Mutation::DeleteKey { .. } => OperationName::DeleteKey,
        }
    }

    /// The key this mutation targets
    pub fn key(&self) -> &str {
        match self {
            Mutation::Set { key, .. } | Mutation::Delete { key, .. } | Mutation::DeleteKey { key } => key,
        }
    }

    /// Positional arguments in log order
    pub fn args(&self) -> Vec<&str> {
        match self {
            Mutation::Set { key, column, value } => vec![key.as_str(), column.as_str(), value.as_str()],
            Mutation::Delete { key, column } => vec![key.as_str(), column.as_str()],
            Mutation::DeleteKey { key } => vec![key.as_str()],
        }
    }

    /// Encode as a single terminated log line: `name,arg1,arg2,...\n`
    ///
    /// Fails if an argument contains the delimiter or a line break, since
    /// the format has no escaping and such a record could not be replayed.
    pub fn encode(&self) -> Result<String> {
        let args = self.args();

        if let Some(bad) = args
            .iter()
            .find(|arg| arg.contains([DELIMITER, TERMINATOR, '\r']))
        {
            return Err(KcvError::UnloggableArgument(bad.to_string()));
        }

        let mut line = String::with_capacity(
            self.name().as_str().len() + args.iter().map(|a| a.len() + 1).sum::<usize>() + 1,
        );
        line.push_str(self.name().as_str());
        for arg in args {
            line.push(DELIMITER);
            line.push_str(arg);
        }
        line.push(TERMINATOR);

        Ok(line)
    }

    /// Parse one log line (without its terminator)
    pub fn parse(line: &str) -> Result<Self> {
        if line.is_empty() {
            return Err(KcvError::MalformedRecord("empty line".to_string()));
        }

        let mut parts = line.split(DELIMITER);
        let name: OperationName = parts.next().unwrap_or_default().parse()?;
        let args: Vec<&str> = parts.collect();

        match (name, args.as_slice()) {
            (OperationName::Set, [key, column, value]) => Ok(Mutation::set(*key, *column, *value)),
            (OperationName::Delete, [key, column]) => Ok(Mutation::delete(*key, *column)),
            (OperationName::DeleteKey, [key]) => Ok(Mutation::delete_key(*key)),
            (name, args) => Err(KcvError::MalformedRecord(format!(
                "`{}` expects {} arguments, got {}",
                name,
                name.arity(),
                args.len()
            ))),
        }
    }
}

impl FromStr for Mutation {
    type Err = KcvError;

    fn from_str(line: &str) -> Result<Self> {
        Mutation::parse(line)
    }
}
