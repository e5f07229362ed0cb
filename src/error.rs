// LapsSync - Top-level error types
//
// Aggregates configuration, directory and vault errors, plus the faults the
// sync itself can raise, into a single enum for the application boundary.

use thiserror::Error;

/// Top-level error type for all sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Directory error: {0}")]
    Directory(#[from] crate::directory::DirectoryError),

    #[error("Vault error: {0}")]
    Store(#[from] crate::vault::StoreError),

    #[error("Vault item '{title}' has an unexpected layout: {detail}")]
    Integrity { title: String, detail: String },

    #[error("No entries returned from the directory")]
    NoDirectoryRecords,
}

pub type Result<T> = std::result::Result<T, SyncError>;
