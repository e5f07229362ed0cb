// LapsSync - Vault data models
//
// Items follow the 1Password LOGIN layout: slot 0 username, slot 1 password,
// slot 2 notes. The sync relies on that order, so the helpers below only look
// at the expected slot instead of searching by label.
//
// SECURITY: password field values are redacted in Debug output.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Slot index of the username field.
pub const USERNAME_SLOT: usize = 0;
/// Slot index of the password field.
pub const PASSWORD_SLOT: usize = 1;
/// Slot index of the notes field.
pub const NOTES_SLOT: usize = 2;

/// Purpose tag carried by a field.
///
/// Unknown tags (including the empty string Connect sends for plain fields)
/// are kept verbatim in `Other` so they are written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldPurpose {
    Username,
    Password,
    Notes,
    Other(String),
}

impl FieldPurpose {
    pub fn as_str(&self) -> &str {
        match self {
            FieldPurpose::Username => "USERNAME",
            FieldPurpose::Password => "PASSWORD",
            FieldPurpose::Notes => "NOTES",
            FieldPurpose::Other(tag) => tag,
        }
    }
}

impl From<String> for FieldPurpose {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "USERNAME" => FieldPurpose::Username,
            "PASSWORD" => FieldPurpose::Password,
            "NOTES" => FieldPurpose::Notes,
            _ => FieldPurpose::Other(tag),
        }
    }
}

impl From<FieldPurpose> for String {
    fn from(purpose: FieldPurpose) -> Self {
        match purpose {
            FieldPurpose::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPurpose::Other(tag) if tag.is_empty() => f.write_str("untagged"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// A named slot inside a vault item.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultField {
    pub id: String,
    #[serde(rename = "type", default = "default_field_type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<FieldPurpose>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: String,
    /// Attributes not modeled here (section, entropy, totp, ...), written back as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_field_type() -> String {
    "STRING".to_string()
}

impl VaultField {
    pub fn new(
        id: impl Into<String>,
        purpose: Option<FieldPurpose>,
        label: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            field_type: default_field_type(),
            purpose,
            label: label.into(),
            value: value.into(),
            extra: Map::new(),
        }
    }

    pub fn has_purpose(&self, purpose: &FieldPurpose) -> bool {
        self.purpose.as_ref() == Some(purpose)
    }
}

impl fmt::Debug for VaultField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value: &dyn fmt::Debug = if self.has_purpose(&FieldPurpose::Password) {
            &"[REDACTED]"
        } else {
            &self.value
        };
        f.debug_struct("VaultField")
            .field("id", &self.id)
            .field("type", &self.field_type)
            .field("purpose", &self.purpose)
            .field("label", &self.label)
            .field("value", value)
            .finish_non_exhaustive()
    }
}

/// A fully-fetched vault item.
#[derive(Debug, Clone, PartialEq)]
pub struct VaultEntry {
    pub id: String,
    pub container_id: String,
    pub category: String,
    pub title: String,
    pub fields: Vec<VaultField>,
    /// Item attributes the sync never touches (tags, urls, sections, version, ...).
    pub extra: Map<String, Value>,
}

impl VaultEntry {
    /// The stored password, if slot 1 exists and is tagged `PASSWORD`.
    pub fn password(&self) -> Option<&str> {
        self.fields
            .get(PASSWORD_SLOT)
            .filter(|field| field.has_purpose(&FieldPurpose::Password))
            .map(|field| field.value.as_str())
    }

    /// Purpose of the field at `slot`, or `None` if the slot is missing or untagged.
    pub fn purpose_at(&self, slot: usize) -> Option<&FieldPurpose> {
        self.fields.get(slot).and_then(|field| field.purpose.as_ref())
    }
}

/// Item listing row: enough to fetch the full item, no fields.
#[derive(Debug, Clone, PartialEq)]
pub struct VaultEntrySummary {
    pub id: String,
    pub container_id: String,
    pub title: String,
}

/// Input for creating an item. The caller assigns all identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVaultEntry {
    pub id: String,
    pub category: String,
    pub title: String,
    pub fields: Vec<VaultField>,
}

// ─── Tests ───────────────────────────────────────────────────────────────────
