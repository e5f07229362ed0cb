// LapsSync - Action executor
//
// Applies reconciliation actions to the vault, one at a time, in emission
// order. The first failure stops the run; items already written stay written.

use chrono::{DateTime, Utc};
use tracing::{error, info};
use uuid::Uuid;

use super::engine::ReconciliationAction;
use super::report::{AppliedAction, SyncReport};
use crate::config::VaultConfig;
use crate::directory::CredentialRecord;
use crate::error::SyncError;
use crate::vault::{
    FieldPurpose, NewVaultEntry, SecretStore, VaultEntry, VaultField, NOTES_SLOT, PASSWORD_SLOT,
};

/// Category used for every item the sync creates.
pub const ITEM_CATEGORY: &str = "LOGIN";

/// Field id Connect uses for an item's notes section.
const NOTES_FIELD_ID: &str = "notesPlain";

const MARKER_PREFIX: &str = "laps-sync";

pub struct ActionExecutor<'a, S: SecretStore + ?Sized> {
    store: &'a S,
    vault_title: &'a str,
    default_username: &'a str,
}

impl<'a, S: SecretStore + ?Sized> ActionExecutor<'a, S> {
    pub fn new(store: &'a S, config: &'a VaultConfig) -> Self {
        Self {
            store,
            vault_title: &config.vault_title,
            default_username: &config.default_username,
        }
    }

    /// Apply one action: one container lookup, then one write.
    pub async fn apply(&self, action: &ReconciliationAction<'_>) -> Result<AppliedAction, SyncError> {
        match action {
            ReconciliationAction::CreateSecret { record } => self.create(record).await,
            ReconciliationAction::RotateSecret { target, record } => {
                self.rotate(target, record).await
            }
        }
    }

    /// Apply every action in order, stopping at the first error.
    pub async fn execute_all(
        &self,
        actions: &[ReconciliationAction<'_>],
    ) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport::default();
        for action in actions {
            match self.apply(action).await {
                Ok(applied) => report.record(&applied),
                Err(e) => {
                    error!(
                        host = %action.record().host_key,
                        created = report.created,
                        rotated = report.rotated,
                        "Aborted due to previous error"
                    );
                    return Err(e);
                }
            }
        }
        Ok(report)
    }

    async fn create(&self, record: &CredentialRecord) -> Result<AppliedAction, SyncError> {
        info!(host = %record.host_key, "Creating vault item");

        let container_id = self.store.resolve_container(self.vault_title).await?;
        let item = new_login_item(record, self.default_username, Utc::now());
        let created = self.store.create_entry(&container_id, item).await?;

        info!(title = %created.title, id = %created.id, "Created vault item");
        Ok(AppliedAction::Created(created))
    }

    async fn rotate(
        &self,
        target: &VaultEntry,
        record: &CredentialRecord,
    ) -> Result<AppliedAction, SyncError> {
        info!(host = %record.host_key, item = %target.id, "Rotating vault item");

        check_layout(target)?;
        self.store.resolve_container(self.vault_title).await?;

        let mut updated = target.clone();
        updated.fields[PASSWORD_SLOT].value = record.secret().to_string();
        updated.fields[NOTES_SLOT].value = marker("Updated", Utc::now());

        let saved = self.store.update_entry(&updated).await?;

        info!(title = %saved.title, id = %saved.id, "Rotated vault item");
        Ok(AppliedAction::Rotated(saved))
    }
}

/// Slot 1 must be the password and slot 2 the notes before anything is written.
fn check_layout(entry: &VaultEntry) -> Result<(), SyncError> {
    for (slot, expected) in [(PASSWORD_SLOT, FieldPurpose::Password), (NOTES_SLOT, FieldPurpose::Notes)] {
        let found = entry.purpose_at(slot);
        if found != Some(&expected) {
            let found = found.map_or_else(|| "nothing".to_string(), |p| p.to_string());
            return Err(SyncError::Integrity {
                title: entry.title.clone(),
                detail: format!("field {} purpose is {}, expected {}", slot, found, expected),
            });
        }
    }
    Ok(())
}

fn marker(verb: &str, now: DateTime<Utc>) -> String {
    format!("{} by {} on {}", verb, MARKER_PREFIX, now.to_rfc3339())
}

/// Build the three-field LOGIN item for a directory record.
fn new_login_item(record: &CredentialRecord, username: &str, now: DateTime<Utc>) -> NewVaultEntry {
    NewVaultEntry {
        id: Uuid::new_v4().to_string(),
        category: ITEM_CATEGORY.to_string(),
        title: record.host_key.clone(),
        fields: vec![
            VaultField::new(Uuid::new_v4().to_string(), Some(FieldPurpose::Username), "Username", username),
            VaultField::new(
                Uuid::new_v4().to_string(),
                Some(FieldPurpose::Password),
                "Password",
                record.secret(),
            ),
            VaultField::new(NOTES_FIELD_ID, Some(FieldPurpose::Notes), NOTES_FIELD_ID, marker("Created", now)),
        ],
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
