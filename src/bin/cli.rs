//! keycolval CLI
//!
//! Runs one store operation against an (optionally persisted) store and
//! prints the result as JSON.

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use keycolval::protocol::Command;
use keycolval::{Backend, Config, Engine, KcvError, LogSyncStrategy, OperationLog};
use tracing_subscriber::{fmt, EnvFilter};

/// keycolval CLI
#[derive(Parser, Debug)]
#[command(name = "keycolval")]
#[command(about = "Embedded key/column/value store")]
#[command(version)]
struct Args {
    /// Operation log file (omit to run in memory)
    #[arg(short, long)]
    log: Option<PathBuf>,

    /// Store backend: hash or tree
    #[arg(short, long, default_value = "hash")]
    backend: Backend,

    /// When to fsync the operation log
    #[arg(long, value_enum, default_value_t = SyncArg::Os)]
    sync: SyncArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SyncArg {
    /// Leave flushing to the OS
    Os,
    /// fsync after every record
    EveryWrite,
}

impl From<SyncArg> for LogSyncStrategy {
    fn from(sync: SyncArg) -> Self {
        match sync {
            SyncArg::Os => LogSyncStrategy::OsBuffered,
            SyncArg::EveryWrite => LogSyncStrategy::EveryWrite,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Set a column value
    Set {
        key: String,
        column: String,
        value: String,
    },

    /// Get a column value
    Get { key: String, column: String },

    /// Get all columns of a key
    GetKey { key: String },

    /// List all keys
    GetKeys,

    /// Delete a column
    Delete { key: String, column: String },

    /// Delete a key and all its columns
    DeleteKey { key: String },

    /// Get a column slice; use `none` or `null` for an open bound
    Slice {
        key: String,
        start: String,
        end: String,
    },

    /// Check that the operation log replays cleanly
    Verify,
}

/// `none` / `null` mean an open slice bound
fn slice_bound(bound: String) -> Option<String> {
    match bound.to_ascii_lowercase().as_str() {
        "none" | "null" => None,
        _ => Some(bound),
    }
}

impl Commands {
    fn into_command(self) -> Option<Command> {
        let command = match self {
            Commands::Set { key, column, value } => Command::Set { key, column, value },
            Commands::Get { key, column } => Command::Get { key, column },
            Commands::GetKey { key } => Command::GetKey { key },
            Commands::GetKeys => Command::GetKeys,
            Commands::Delete { key, column } => Command::Delete { key, column },
            Commands::DeleteKey { key } => Command::DeleteKey { key },
            Commands::Slice { key, start, end } => Command::GetSlice {
                key,
                start: slice_bound(start),
                end: slice_bound(end),
            },
            Commands::Verify => return None,
        };
        Some(command)
    }
}

fn main() {
    // Logs go to stderr so stdout stays machine-readable
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,keycolval=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let Some(command) = args.command.into_command() else {
        let path = args
            .log
            .ok_or_else(|| KcvError::Config("verify requires --log".to_string()))?;
        let stats = OperationLog::verify(&path)?;
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    };

    let mut builder = Config::builder()
        .backend(args.backend)
        .sync_strategy(args.sync.into());
    if let Some(path) = args.log {
        builder = builder.log_path(path);
    }

    let mut engine = Engine::open(builder.build())?;
    let response = engine.execute(command)?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    engine.close()?;
    Ok(())
}
