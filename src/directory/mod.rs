// LapsSync - Directory Module
//
// Reads LAPS-managed computer objects from the directory service and turns
// them into `CredentialRecord`s. FILETIME decoding lives here because the
// expiration attribute is the only place it is needed.

mod error;
pub mod filetime;
mod ldap;
mod record;

use async_trait::async_trait;

pub use error::DirectoryError;
pub use ldap::{LdapDirectorySource, LAPS_ATTRIBUTES};
pub use record::CredentialRecord;

/// Anything that can enumerate the current LAPS credentials.
#[async_trait]
pub trait DirectorySource {
    /// Fetch every managed host. Connection, bind and search failures abort.
    async fn fetch_records(&self) -> Result<Vec<CredentialRecord>, DirectoryError>;
}
