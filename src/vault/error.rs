// LapsSync - Vault error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Vault server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Vault '{0}' not found")]
    ContainerNotFound(String),

    #[error("Vault '{name}' found more than once ({count} matches)")]
    ContainerAmbiguous { name: String, count: usize },

    #[error("Vault item not found: {0}")]
    NotFound(String),
}

impl StoreError {
    /// Turn a 404 from the server into `NotFound` for the given item.
    pub(crate) fn or_not_found(self, entry_id: &str) -> Self {
        match self {
            StoreError::Status { status: 404, .. } => StoreError::NotFound(entry_id.to_string()),
            other => other,
        }
    }
}
