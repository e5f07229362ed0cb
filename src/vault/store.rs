// LapsSync - Secret store abstraction
//
// The reconciliation core only talks to the vault through `SecretStore`.
// Every call is awaited before the next one starts.

use async_trait::async_trait;

use super::models::{NewVaultEntry, VaultEntry, VaultEntrySummary};
use super::StoreError;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the downstream vault.
#[async_trait]
pub trait SecretStore {
    /// Resolve a container (vault) name to its id.
    /// Zero or multiple matches are errors.
    async fn resolve_container(&self, name: &str) -> Result<String, StoreError>;

    /// List the items of a container, without field detail.
    async fn list_entries(&self, container_id: &str) -> Result<Vec<VaultEntrySummary>, StoreError>;

    /// Fetch one item with all of its fields.
    async fn get_entry(&self, container_id: &str, entry_id: &str) -> Result<VaultEntry, StoreError>;

    /// Insert a new item into a container.
    async fn create_entry(
        &self,
        container_id: &str,
        entry: NewVaultEntry,
    ) -> Result<VaultEntry, StoreError>;

    /// Replace an existing item with the given state.
    async fn update_entry(&self, entry: &VaultEntry) -> Result<VaultEntry, StoreError>;
}

// ─── In-Memory Mock for Testing ──────────────────────────────────────────────


// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::mock::MockSecretStore;
    use super::*;

    #[tokio::test]
    async fn test_resolve_container_unique() {
        let store = MockSecretStore::new("LAPS");
        assert_eq!(store.resolve_container("LAPS").await.unwrap(), "vault-1");
    }

    #[tokio::test]
    async fn test_resolve_container_missing() {
        let store = MockSecretStore::new("LAPS");
        let err = store.resolve_container("Other").await.unwrap_err();
        assert!(matches!(err, StoreError::ContainerNotFound(name) if name == "Other"));
    }

    #[tokio::test]
    async fn test_resolve_container_ambiguous() {
        let store = MockSecretStore::new("LAPS").with_container("vault-2", "LAPS");
        let err = store.resolve_container("LAPS").await.unwrap_err();
        assert!(matches!(err, StoreError::ContainerAmbiguous { count: 2, .. }));
    }
}
