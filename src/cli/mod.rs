// LapsSync - CLI Module
//
// Command-line interface using clap derive macros.
// Subcommands: sync (default), check.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub use commands::execute;

/// laps-sync - copy LAPS passwords from Active Directory into a 1Password vault.
#[derive(Parser, Debug)]
#[command(name = "laps-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log verbosity. `RUST_LOG` takes precedence when set.
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Write the log to this file instead of stdout (appends).
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The subcommand to run; a bare invocation syncs.
    pub fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Sync { dry_run: false })
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Reconcile the directory with the vault.
    Sync {
        /// Only log the planned creates and rotations, write nothing.
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the environment configuration and exit.
    Check,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[value(alias = "warning")]
    Warn,
    Error,
}

impl LogLevel {
    /// Default `EnvFilter` directive for this level.
    pub fn directive(self) -> String {
        let level = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        format!("laps_sync={}", level)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
