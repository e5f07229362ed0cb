// LapsSync - Directory error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Failed to connect to directory at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: ldap3::LdapError,
    },

    #[error("Directory bind rejected the credentials for {bind_dn}")]
    InvalidCredentials { bind_dn: String },

    #[error("Directory bind failed for {bind_dn} (code {rc}): {text}")]
    Bind { bind_dn: String, rc: u32, text: String },

    #[error("Directory search failed: {0}")]
    Search(String),

    #[error("LDAP error: {0}")]
    Ldap(#[from] ldap3::LdapError),
}
