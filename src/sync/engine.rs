// LapsSync - Reconciliation engine
//
// Pure diff between the directory records and a snapshot of the vault. For
// every record it decides: create an item, rotate an item, or do nothing.
// No I/O happens here; applying the actions is the executor's job.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, info, trace, warn};

use super::keyer::{HostNameKeyer, RecordKeyer};
use crate::directory::CredentialRecord;
use crate::vault::VaultEntry;

/// What the vault needs for one directory record.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconciliationAction<'a> {
    /// No item carries the record's host name yet.
    CreateSecret { record: &'a CredentialRecord },
    /// `target` is the first item titled with the host name and its stored
    /// password differs from the record's (or is not where it should be).
    RotateSecret {
        target: &'a VaultEntry,
        record: &'a CredentialRecord,
    },
}

impl<'a> ReconciliationAction<'a> {
    pub fn record(&self) -> &'a CredentialRecord {
        match *self {
            ReconciliationAction::CreateSecret { record } => record,
            ReconciliationAction::RotateSecret { record, .. } => record,
        }
    }
}

impl fmt::Display for ReconciliationAction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconciliationAction::CreateSecret { record } => {
                write!(f, "create  {}", record.host_key)
            }
            ReconciliationAction::RotateSecret { target, record } => {
                write!(f, "rotate  {} (item {})", record.host_key, target.id)
            }
        }
    }
}

/// Diff with the default host-name join.
pub fn reconcile<'a>(
    records: &'a [CredentialRecord],
    entries: &'a [VaultEntry],
) -> Vec<ReconciliationAction<'a>> {
    reconcile_with(&HostNameKeyer, records, entries)
}

/// Diff `records` against `entries`, joined by `keyer`.
///
/// Output order follows `records`. Each record yields at most one action.
/// Records with an empty password never yield an action.
pub fn reconcile_with<'a, K>(
    keyer: &K,
    records: &'a [CredentialRecord],
    entries: &'a [VaultEntry],
) -> Vec<ReconciliationAction<'a>>
where
    K: RecordKeyer + ?Sized,
{
    let index = index_entries(keyer, entries);
    let mut seen: HashSet<Cow<'a, str>> = HashSet::with_capacity(records.len());
    let mut actions = Vec::new();

    for record in records {
        let key = keyer.record_key(record);

        if key.is_empty() {
            warn!(name = %record.logical_name, "Directory record has no host name");
        }
        if !seen.insert(key.clone()) {
            warn!(host = %key, "Host name appears more than once in the directory records");
        }
        if record.secret().is_empty() {
            warn!(host = %key, "Directory record has no password, skipping");
            continue;
        }

        let Some(entry) = index.get(key.as_ref()).copied() else {
            trace!(host = %key, "Not found in vault");
            actions.push(ReconciliationAction::CreateSecret { record });
            continue;
        };

        trace!(host = %key, item = %entry.id, "Found in vault");
        match entry.password() {
            Some(stored) if stored == record.secret() => {
                debug!(host = %key, "Password unchanged");
            }
            Some(_) => {
                info!(host = %key, "Update required");
                actions.push(ReconciliationAction::RotateSecret { target: entry, record });
            }
            None => {
                warn!(host = %key, item = %entry.id, "Vault item has no password in slot 1");
                actions.push(ReconciliationAction::RotateSecret { target: entry, record });
            }
        }
    }

    actions
}

/// Build the title lookup once. The first item wins for duplicate titles.
fn index_entries<'a, K>(keyer: &K, entries: &'a [VaultEntry]) -> HashMap<Cow<'a, str>, &'a VaultEntry>
where
    K: RecordKeyer + ?Sized,
{
    let mut index: HashMap<Cow<'a, str>, &'a VaultEntry> = HashMap::with_capacity(entries.len());
    for entry in entries {
        let key = keyer.entry_key(entry);
        if let Some(first) = index.get(key.as_ref()) {
            warn!(title = %key, kept = %first.id, ignored = %entry.id, "Duplicate vault item title");
            continue;
        }
        index.insert(key, entry);
    }
    index
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::{FieldPurpose, VaultField};

    fn record(host: &str, secret: &str) -> CredentialRecord {
        let name = host.split('.').next().unwrap_or(host);
        CredentialRecord::new(name, host, secret, None)
    }

    fn entry(id: &str, title: &str, slot1: FieldPurpose, password: &str) -> VaultEntry {
        VaultEntry {
            id: id.to_string(),
            container_id: "vault-1".to_string(),
            category: "LOGIN".to_string(),
            title: title.to_string(),
            fields: vec![
                VaultField::new("u", Some(FieldPurpose::Username), "username", "Administrator"),
                VaultField::new("p", Some(slot1), "password", password),
                VaultField::new("notesPlain", Some(FieldPurpose::Notes), "notesPlain", ""),
            ],
            extra: Default::default(),
        }
    }

    #[test]
    fn test_missing_host_creates_secret() {
        let records = vec![record("PC01.domain", "abc")];
        let actions = reconcile(&records, &[]);

        assert_eq!(actions.len(), 1);
        match &actions[0] {
            ReconciliationAction::CreateSecret { record } => {
                assert_eq!(record.host_key, "PC01.domain");
                assert_eq!(record.secret(), "abc");
            }
            other => panic!("Expected CreateSecret, got {:?}", other),
        }
    }

    #[test]
    fn test_changed_password_rotates_secret() {
        let records = vec![record("PC01.domain", "xyz")];
        let entries = vec![entry("item-1", "PC01.domain", FieldPurpose::Password, "abc")];
        let actions = reconcile(&records, &entries);

        assert_eq!(actions.len(), 1);
        match &actions[0] {
            ReconciliationAction::RotateSecret { target, record } => {
                assert_eq!(target.id, "item-1");
                assert_eq!(record.secret(), "xyz");
            }
            other => panic!("Expected RotateSecret, got {:?}", other),
        }
    }

    #[test]
    fn test_unchanged_password_emits_nothing() {
        let records = vec![record("PC01.domain", "abc")];
        let entries = vec![entry("item-1", "PC01.domain", FieldPurpose::Password, "abc")];
        assert!(reconcile(&records, &entries).is_empty());
    }

    #[test]
    fn test_wrong_slot_layout_still_rotates() {
        // The executor rejects this layout; the engine only flags the mismatch.
        let records = vec![record("PC01.domain", "abc")];
        let entries = vec![entry("item-1", "PC01.domain", FieldPurpose::Username, "abc")];
        let actions = reconcile(&records, &entries);

        assert!(matches!(
            actions.as_slice(),
            [ReconciliationAction::RotateSecret { target, .. }] if target.id == "item-1"
        ));
    }

    #[test]
    fn test_empty_secret_is_skipped() {
        let records = vec![record("PC01.domain", ""), record("PC02.domain", "")];
        let entries = vec![entry("item-1", "PC01.domain", FieldPurpose::Password, "stored")];
        assert!(reconcile(&records, &entries).is_empty(), "empty secrets never overwrite or create");
    }

    #[test]
    fn test_duplicate_titles_use_first_match() {
        let records = vec![record("PC01.domain", "new")];
        let entries = vec![
            entry("first", "PC01.domain", FieldPurpose::Password, "old"),
            entry("second", "PC01.domain", FieldPurpose::Password, "new"),
        ];
        let actions = reconcile(&records, &entries);

        assert!(matches!(
            actions.as_slice(),
            [ReconciliationAction::RotateSecret { target, .. }] if target.id == "first"
        ));
    }

    #[test]
    fn test_title_match_is_case_sensitive() {
        let records = vec![record("PC01.domain", "abc")];
        let entries = vec![entry("item-1", "pc01.domain", FieldPurpose::Password, "abc")];
        let actions = reconcile(&records, &entries);
        assert!(matches!(actions.as_slice(), [ReconciliationAction::CreateSecret { .. }]));
    }

    #[test]
    fn test_output_follows_record_order() {
        let records = vec![
            record("C.domain", "3"),
            record("A.domain", "1"),
            record("B.domain", "2"),
            record("D.domain", "4"),
        ];
        let entries = vec![
            entry("b", "B.domain", FieldPurpose::Password, "old"),
            entry("a", "A.domain", FieldPurpose::Password, "1"),
        ];
        let actions = reconcile(&records, &entries);

        let hosts: Vec<&str> = actions.iter().map(|a| a.record().host_key.as_str()).collect();
        assert_eq!(hosts, vec!["C.domain", "B.domain", "D.domain"]);
    }

    #[test]
    fn test_reconcile_is_deterministic() {
        let records: Vec<_> = (0..50)
            .map(|i| record(&format!("PC{:02}.domain", i), &format!("pw{}", i)))
            .collect();
        let entries: Vec<_> = (0..50)
            .step_by(3)
            .map(|i| {
                let stored = if i % 2 == 0 { format!("pw{}", i) } else { "stale".to_string() };
                entry(&format!("item-{}", i), &format!("PC{:02}.domain", i), FieldPurpose::Password, &stored)
            })
            .collect();

        let first = reconcile(&records, &entries);
        let second = reconcile(&records, &entries);
        assert_eq!(first, second);
    }

    #[test]
    fn test_every_record_gets_at_most_one_action() {
        let records = vec![
            record("A.domain", "1"),
            record("B.domain", "2"),
            record("C.domain", "3"),
        ];
        let entries = vec![
            entry("a", "A.domain", FieldPurpose::Password, "1"),
            entry("b", "B.domain", FieldPurpose::Password, "x"),
        ];
        let actions = reconcile(&records, &entries);

        for r in &records {
            let count = actions.iter().filter(|a| a.record().host_key == r.host_key).count();
            assert!(count <= 1, "{} has {} actions", r.host_key, count);
        }
        let creates = actions
            .iter()
            .filter(|a| matches!(a, ReconciliationAction::CreateSecret { .. }))
            .count();
        assert_eq!(creates, 1);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let records = vec![record("PC01.domain", "xyz")];
        let entries = vec![entry("item-1", "PC01.domain", FieldPurpose::Password, "abc")];
        let records_before = records.clone();
        let entries_before = entries.clone();

        let _ = reconcile(&records, &entries);

        assert_eq!(records, records_before);
        assert_eq!(entries, entries_before);
    }

    #[test]
    fn test_empty_host_key_is_still_processed() {
        let records = vec![CredentialRecord::new("PC01", "", "abc", None)];

        let actions = reconcile(&records, &[]);
        assert_eq!(actions.len(), 1);
        assert!(matches!(actions[0], ReconciliationAction::CreateSecret { .. }));

        let entries = vec![entry("untitled", "", FieldPurpose::Password, "old")];
        let actions = reconcile(&records, &entries);
        match &actions[..] {
            [ReconciliationAction::RotateSecret { target, record }] => {
                assert_eq!(target.id, "untitled");
                assert_eq!(record.logical_name, "PC01");
            }
            other => panic!("Expected one RotateSecret, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_record_keys_each_get_an_action() {
        let records = vec![record("PC01.domain", "first"), record("PC01.domain", "second")];

        let actions = reconcile(&records, &[]);
        let secrets: Vec<&str> = actions.iter().map(|a| a.record().secret()).collect();
        assert_eq!(secrets, vec!["first", "second"]);

        let entries = vec![entry("item-1", "PC01.domain", FieldPurpose::Password, "first")];
        let actions = reconcile(&records, &entries);
        match &actions[..] {
            [ReconciliationAction::RotateSecret { target, record }] => {
                assert_eq!(target.id, "item-1");
                assert_eq!(record.secret(), "second");
            }
            other => panic!("Expected one RotateSecret, got {:?}", other),
        }
    }
}
