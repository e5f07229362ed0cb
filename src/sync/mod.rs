// LapsSync - Sync Module
//
// Glue for one reconciliation run: fetch directory records, snapshot the
// vault, diff, then apply the plan through the executor.

mod engine;
mod executor;
mod keyer;
mod report;

use tracing::{debug, info, trace, warn};

pub use engine::{reconcile, reconcile_with, ReconciliationAction};
pub use executor::{ActionExecutor, ITEM_CATEGORY};
pub use keyer::{HostNameKeyer, RecordKeyer};
pub use report::{AppliedAction, SyncReport};

use crate::config::VaultConfig;
use crate::directory::DirectorySource;
use crate::error::SyncError;
use crate::vault::{SecretStore, StoreError, VaultEntry};

/// Read every item of the configured vault with full field detail.
///
/// The item list carries no fields, so each item is fetched individually.
pub async fn load_vault_snapshot<S>(store: &S, vault_title: &str) -> Result<Vec<VaultEntry>, StoreError>
where
    S: SecretStore + ?Sized,
{
    let container_id = store.resolve_container(vault_title).await?;
    debug!(vault = %vault_title, id = %container_id, "Resolved vault");

    let summaries = store.list_entries(&container_id).await?;
    debug!(count = summaries.len(), "Listed vault items");

    let mut entries = Vec::with_capacity(summaries.len());
    for (index, summary) in summaries.iter().enumerate() {
        let entry = store.get_entry(&summary.container_id, &summary.id).await?;
        trace!(index, title = %entry.title, "Vault item");
        entries.push(entry);
    }
    Ok(entries)
}

/// Run one full reconciliation.
///
/// With `dry_run` the plan is logged and counted but nothing is written.
pub async fn run<D, S>(
    directory: &D,
    store: &S,
    config: &VaultConfig,
    dry_run: bool,
) -> Result<SyncReport, SyncError>
where
    D: DirectorySource + ?Sized,
    S: SecretStore + ?Sized,
{
    let records = directory.fetch_records().await?;
    if records.is_empty() {
        return Err(SyncError::NoDirectoryRecords);
    }

    let entries = load_vault_snapshot(store, &config.vault_title).await?;
    if entries.is_empty() {
        warn!(vault = %config.vault_title, "No entries returned from vault");
    }

    let actions = reconcile(&records, &entries);
    let skipped = records.iter().filter(|r| r.secret().is_empty()).count();
    let unchanged = records.len() - skipped - actions.len();

    let mut report = if dry_run {
        let mut planned = SyncReport::default();
        for action in &actions {
            info!(action = %action, "Planned");
            match action {
                ReconciliationAction::CreateSecret { .. } => planned.created += 1,
                ReconciliationAction::RotateSecret { .. } => planned.rotated += 1,
            }
        }
        info!("Dry run, nothing written");
        planned
    } else {
        ActionExecutor::new(store, config).execute_all(&actions).await?
    };

    report.unchanged = unchanged;
    report.skipped = skipped;
    info!(
        created = report.created,
        rotated = report.rotated,
        unchanged = report.unchanged,
        skipped = report.skipped,
        "Sync finished"
    );
    Ok(report)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
