// LapsSync - Directory credential record
//
// SECURITY: the LAPS password is kept private and zeroized on drop. It never
// appears in Debug or Display output.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use super::filetime;

/// LDAP attribute carrying the short computer name.
pub const ATTR_NAME: &str = "name";
/// LDAP attribute carrying the host FQDN.
pub const ATTR_DNS_HOST_NAME: &str = "dNSHostName";
/// LDAP attribute carrying the LAPS password.
pub const ATTR_ADM_PWD: &str = "ms-Mcs-AdmPwd";
/// LDAP attribute carrying the LAPS expiration FILETIME.
pub const ATTR_ADM_PWD_EXPIRATION: &str = "ms-Mcs-AdmPwdExpirationTime";

/// One LAPS-managed computer as read from the directory.
pub struct CredentialRecord {
    /// Short host name (informational only).
    pub logical_name: String,
    /// Fully-qualified host name, the correlation key.
    pub host_key: String,
    secret: Zeroizing<String>,
    /// `None` when the directory had no usable expiration.
    pub expires_at: Option<DateTime<Utc>>,
}

impl CredentialRecord {
    pub fn new(
        logical_name: impl Into<String>,
        host_key: impl Into<String>,
        secret: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            logical_name: logical_name.into(),
            host_key: host_key.into(),
            secret: Zeroizing::new(secret.into()),
            expires_at,
        }
    }

    /// Build a record from raw LDAP attributes. Missing attributes become
    /// empty strings; only the first value of each attribute is used.
    pub fn from_attributes(attrs: &HashMap<String, Vec<String>>) -> Self {
        let first = |name: &str| -> String {
            attrs
                .get(name)
                .and_then(|values| values.first())
                .cloned()
                .unwrap_or_default()
        };

        Self::new(
            first(ATTR_NAME),
            first(ATTR_DNS_HOST_NAME),
            first(ATTR_ADM_PWD),
            filetime::parse_expiration(&first(ATTR_ADM_PWD_EXPIRATION)),
        )
    }

    /// The current plaintext password.
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl Clone for CredentialRecord {
    fn clone(&self) -> Self {
        Self {
            logical_name: self.logical_name.clone(),
            host_key: self.host_key.clone(),
            secret: self.secret.clone(),
            expires_at: self.expires_at,
        }
    }
}

impl PartialEq for CredentialRecord {
    fn eq(&self, other: &Self) -> bool {
        self.logical_name == other.logical_name
            && self.host_key == other.host_key
            && self.secret.as_str() == other.secret.as_str()
            && self.expires_at == other.expires_at
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("logical_name", &self.logical_name)
            .field("host_key", &self.host_key)
            .field("secret", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl fmt::Display for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.expires_at {
            Some(at) => write!(f, "{} ({}) expires {}", self.host_key, self.logical_name, at.to_rfc3339()),
            None => write!(f, "{} ({})", self.host_key, self.logical_name),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), vec![v.to_string()]))
            .collect()
    }

    #[test]
    fn test_record_debug_redacts_secret() {
        let record = CredentialRecord::new("PC01", "PC01.corp.example", "S3cr3t!pw", None);
        let debug_output = format!("{:?}", record);
        assert!(debug_output.contains("[REDACTED]"));
        assert!(
            !debug_output.contains("S3cr3t!pw"),
            "Debug output must NEVER contain the raw secret"
        );
    }

    #[test]
    fn test_record_display_does_not_contain_secret() {
        let record = CredentialRecord::new("PC01", "PC01.corp.example", "S3cr3t!pw", None);
        let display_output = format!("{}", record);
        assert!(!display_output.contains("S3cr3t!pw"));
        assert!(display_output.contains("PC01.corp.example"));
    }

    #[test]
    fn test_from_attributes_maps_laps_fields() {
        let record = CredentialRecord::from_attributes(&attrs(&[
            (ATTR_NAME, "PC01"),
            (ATTR_DNS_HOST_NAME, "PC01.corp.example"),
            (ATTR_ADM_PWD, "abc"),
            (ATTR_ADM_PWD_EXPIRATION, "132223104000000000"),
        ]));

        assert_eq!(record.logical_name, "PC01");
        assert_eq!(record.host_key, "PC01.corp.example");
        assert_eq!(record.secret(), "abc");
        assert_eq!(
            record.expires_at.map(|t| t.to_rfc3339()).as_deref(),
            Some("2020-01-01T00:00:00+00:00")
        );
    }

    #[test]
    fn test_from_attributes_bad_expiration_keeps_record() {
        let record = CredentialRecord::from_attributes(&attrs(&[
            (ATTR_DNS_HOST_NAME, "PC02.corp.example"),
            (ATTR_ADM_PWD, "xyz"),
            (ATTR_ADM_PWD_EXPIRATION, "soon"),
        ]));

        assert_eq!(record.host_key, "PC02.corp.example");
        assert_eq!(record.secret(), "xyz");
        assert!(record.expires_at.is_none());
    }

    #[test]
    fn test_from_attributes_missing_values_are_empty() {
        let record = CredentialRecord::from_attributes(&HashMap::new());
        assert!(record.logical_name.is_empty());
        assert!(record.host_key.is_empty());
        assert!(record.secret().is_empty());
        assert!(record.expires_at.is_none());
    }
}
