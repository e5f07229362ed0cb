// LapsSync - Correlation keys
//
// Records and vault items are joined on a single string key. Keeping the key
// extraction behind a trait lets the join rule change (normalization, case
// folding) without touching the diff.

use std::borrow::Cow;

use crate::directory::CredentialRecord;
use crate::vault::VaultEntry;

pub trait RecordKeyer {
    /// Key of a directory record.
    fn record_key<'a>(&self, record: &'a CredentialRecord) -> Cow<'a, str>;

    /// Key of a vault item. Must produce the same key as `record_key` for the
    /// item created from a record.
    fn entry_key<'a>(&self, entry: &'a VaultEntry) -> Cow<'a, str>;
}

/// Joins `host_key` to `title` with exact codepoint equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostNameKeyer;

impl RecordKeyer for HostNameKeyer {
    fn record_key<'a>(&self, record: &'a CredentialRecord) -> Cow<'a, str> {
        Cow::Borrowed(&record.host_key)
    }

    fn entry_key<'a>(&self, entry: &'a VaultEntry) -> Cow<'a, str> {
        Cow::Borrowed(&entry.title)
    }
}
