// LapsSync - Library root
//
// Re-exports the config, directory, vault, sync, and CLI modules.

pub mod cli;
pub mod config;
pub mod directory;
pub mod error;
pub mod sync;
pub mod vault;

pub use error::{Result, SyncError};
