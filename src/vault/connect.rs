// LapsSync - 1Password Connect client
//
// Thin JSON client for the Connect REST API. Only the calls the sync needs
// are implemented: vault lookup by title, item listing, item detail, create
// and replace.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use zeroize::Zeroizing;

use super::models::{NewVaultEntry, VaultEntry, VaultEntrySummary, VaultField};
use super::{SecretStore, StoreError};
use crate::config::VaultConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ─── Wire Types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ConnectVault {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ConnectItemVault {
    id: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ConnectItem {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    category: String,
    vault: ConnectItemVault,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    fields: Vec<VaultField>,
    // PUT replaces the whole item, so everything else is carried through.
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<ConnectItem> for VaultEntry {
    fn from(item: ConnectItem) -> Self {
        VaultEntry {
            id: item.id,
            container_id: item.vault.id,
            category: item.category,
            title: item.title,
            fields: item.fields,
            extra: item.extra,
        }
    }
}

impl From<&VaultEntry> for ConnectItem {
    fn from(entry: &VaultEntry) -> Self {
        ConnectItem {
            id: entry.id.clone(),
            title: entry.title.clone(),
            category: entry.category.clone(),
            vault: ConnectItemVault {
                id: entry.container_id.clone(),
            },
            fields: entry.fields.clone(),
            extra: entry.extra.clone(),
        }
    }
}

/// SCIM-style filter matching a vault title exactly.
fn title_filter(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
    format!("title eq \"{}\"", escaped)
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// `SecretStore` backed by a 1Password Connect server.
pub struct ConnectStore {
    client: Client,
    host: String,
    token: Zeroizing<String>,
}

impl std::fmt::Debug for ConnectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectStore")
            .field("host", &self.host)
            .finish()
    }
}

impl ConnectStore {
    pub fn new(config: &VaultConfig) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            host: config.connect_host.trim_end_matches('/').to_string(),
            token: config.connect_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1{}", self.host, path)
    }

    /// Send an authorized request and decode a JSON body.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        let response = request.bearer_auth(self.token.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl SecretStore for ConnectStore {
    async fn resolve_container(&self, name: &str) -> Result<String, StoreError> {
        let filter = title_filter(name);
        let vaults: Vec<ConnectVault> = self
            .send(self.client.get(self.url("/vaults")).query(&[("filter", filter)]))
            .await?;

        match vaults.as_slice() {
            [] => Err(StoreError::ContainerNotFound(name.to_string())),
            [vault] => {
                tracing::debug!(vault = %vault.name, id = %vault.id, "Found vault");
                Ok(vault.id.clone())
            }
            many => Err(StoreError::ContainerAmbiguous {
                name: name.to_string(),
                count: many.len(),
            }),
        }
    }

    async fn list_entries(&self, container_id: &str) -> Result<Vec<VaultEntrySummary>, StoreError> {
        let items: Vec<ConnectItem> = self
            .send(self.client.get(self.url(&format!("/vaults/{}/items", container_id))))
            .await?;

        Ok(items
            .into_iter()
            .map(|item| VaultEntrySummary {
                id: item.id,
                container_id: item.vault.id,
                title: item.title,
            })
            .collect())
    }

    async fn get_entry(&self, container_id: &str, entry_id: &str) -> Result<VaultEntry, StoreError> {
        let item: ConnectItem = self
            .send(
                self.client
                    .get(self.url(&format!("/vaults/{}/items/{}", container_id, entry_id))),
            )
            .await
            .map_err(|e| e.or_not_found(entry_id))?;
        Ok(item.into())
    }

    async fn create_entry(
        &self,
        container_id: &str,
        entry: NewVaultEntry,
    ) -> Result<VaultEntry, StoreError> {
        let body = ConnectItem {
            id: entry.id,
            title: entry.title,
            category: entry.category,
            vault: ConnectItemVault {
                id: container_id.to_string(),
            },
            fields: entry.fields,
            extra: Map::new(),
        };

        let item: ConnectItem = self
            .send(
                self.client
                    .post(self.url(&format!("/vaults/{}/items", container_id)))
                    .json(&body),
            )
            .await?;
        Ok(item.into())
    }

    async fn update_entry(&self, entry: &VaultEntry) -> Result<VaultEntry, StoreError> {
        let body = ConnectItem::from(entry);
        let item: ConnectItem = self
            .send(
                self.client
                    .put(self.url(&format!(
                        "/vaults/{}/items/{}",
                        entry.container_id, entry.id
                    )))
                    .json(&body),
            )
            .await
            .map_err(|e| e.or_not_found(&entry.id))?;
        Ok(item.into())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
