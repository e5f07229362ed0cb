// LapsSync - Vault Module
//
// Downstream secret storage. The sync core sees only the `SecretStore` trait;
// `ConnectStore` implements it against a 1Password Connect server.

mod connect;
mod error;
mod models;
mod store;

pub use connect::ConnectStore;
pub use error::StoreError;
pub use models::{
    FieldPurpose, NewVaultEntry, VaultEntry, VaultEntrySummary, VaultField, NOTES_SLOT,
    PASSWORD_SLOT, USERNAME_SLOT,
};
pub use store::SecretStore;

#[cfg(test)]
pub use store::mock;
