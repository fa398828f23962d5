use thiserror::Error;

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage codec: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("store lock poisoned")]
    Poisoned,
    #[error("duplicate highlight id {0}")]
    DuplicateId(String),
}
