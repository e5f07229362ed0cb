// LapsSync - CLI Command Handlers
//
// Each function handles one CLI subcommand. Configuration is read once here
// and handed to the directory source, the vault client and the sync run.

use crate::config::Config;
use crate::directory::LdapDirectorySource;
use crate::error::SyncError;
use crate::sync;
use crate::vault::ConnectStore;

use super::Commands;

/// Execute the parsed CLI command.
pub async fn execute(command: Commands) -> Result<(), SyncError> {
    match command {
        Commands::Sync { dry_run } => cmd_sync(dry_run).await,
        Commands::Check => cmd_check(),
    }
}

// ─── Check ───────────────────────────────────────────────────────────────────

fn cmd_check() -> Result<(), SyncError> {
    let config = Config::from_env()?;

    println!("✓ Environment OK");
    println!("  Connect:   {}", config.vault.connect_host);
    println!("  Vault:     {}", config.vault.vault_title);
    println!("  Directory: {}", config.directory.url);
    println!("  Base DN:   {}", config.directory.base_dn);
    println!("  Filter:    {}", config.directory.filter);

    Ok(())
}

// ─── Sync ────────────────────────────────────────────────────────────────────

async fn cmd_sync(dry_run: bool) -> Result<(), SyncError> {
    tracing::debug!("Start sync");
    let config = Config::from_env()?;

    let directory = LdapDirectorySource::new(&config.directory);
    let store = ConnectStore::new(&config.vault)?;

    let report = sync::run(&directory, &store, &config.vault, dry_run).await?;

    if dry_run {
        println!("Dry run, nothing written: {}", report);
    } else {
        println!("✓ Sync complete: {}", report);
    }

    Ok(())
}
