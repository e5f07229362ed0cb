// LapsSync - LDAP directory source
//
// Binds to Active Directory and pulls every computer object that carries a
// LAPS password. The whole result set is materialized before returning; the
// connection is unbound afterwards.

use std::time::Duration;

use async_trait::async_trait;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, Scope, SearchEntry};
use tracing::{debug, info, trace, warn};

use super::record::{ATTR_ADM_PWD, ATTR_ADM_PWD_EXPIRATION, ATTR_DNS_HOST_NAME, ATTR_NAME};
use super::{CredentialRecord, DirectoryError, DirectorySource};
use crate::config::DirectoryConfig;

/// Attributes requested for every computer object.
pub const LAPS_ATTRIBUTES: [&str; 4] = [ATTR_NAME, ATTR_ADM_PWD, ATTR_ADM_PWD_EXPIRATION, ATTR_DNS_HOST_NAME];

/// Result code AD returns for a bad bind DN or password.
const LDAP_INVALID_CREDENTIALS: u32 = 49;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// `DirectorySource` backed by an LDAP server.
pub struct LdapDirectorySource<'a> {
    config: &'a DirectoryConfig,
}

impl<'a> LdapDirectorySource<'a> {
    pub fn new(config: &'a DirectoryConfig) -> Self {
        Self { config }
    }

    async fn connect(&self) -> Result<Ldap, DirectoryError> {
        let url = &self.config.url;
        debug!(url = %url, "Connecting to directory");

        let settings = LdapConnSettings::new().set_conn_timeout(CONNECT_TIMEOUT);
        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, url)
            .await
            .map_err(|source| DirectoryError::Connect {
                url: url.clone(),
                source,
            })?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "LDAP connection driver error");
            }
        });

        let bind_dn = &self.config.bind_dn;
        debug!(bind_dn = %bind_dn, "Performing LDAP bind");

        let result = ldap
            .simple_bind(bind_dn, self.config.bind_password.as_str())
            .await?;

        match result.rc {
            0 => Ok(ldap),
            LDAP_INVALID_CREDENTIALS => Err(DirectoryError::InvalidCredentials {
                bind_dn: bind_dn.clone(),
            }),
            rc => Err(DirectoryError::Bind {
                bind_dn: bind_dn.clone(),
                rc,
                text: result.text,
            }),
        }
    }
}

#[async_trait]
impl DirectorySource for LdapDirectorySource<'_> {
    async fn fetch_records(&self) -> Result<Vec<CredentialRecord>, DirectoryError> {
        let mut ldap = self.connect().await?;

        // Unbind whether or not the search succeeded.
        let result = self.search(&mut ldap).await;
        if let Err(e) = ldap.unbind().await {
            warn!(error = %e, "LDAP unbind failed");
        }

        let records = result?;
        info!(count = records.len(), "Fetched LAPS records from directory");
        Ok(records)
    }
}

impl LdapDirectorySource<'_> {
    async fn search(&self, ldap: &mut Ldap) -> Result<Vec<CredentialRecord>, DirectoryError> {
        debug!(
            base_dn = %self.config.base_dn,
            filter = %self.config.filter,
            "Searching directory"
        );

        let result = ldap
            .search(
                &self.config.base_dn,
                Scope::Subtree,
                &self.config.filter,
                LAPS_ATTRIBUTES.to_vec(),
            )
            .await?;

        let (entries, _) = result
            .success()
            .map_err(|e| DirectoryError::Search(e.to_string()))?;

        Ok(entries
            .into_iter()
            .map(SearchEntry::construct)
            .enumerate()
            .map(|(index, entry)| {
                let record = CredentialRecord::from_attributes(&entry.attrs);
                trace!(index, host = %record.host_key, "Directory entry");
                record
            })
            .collect())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
