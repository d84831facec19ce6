use crate::model::DocumentId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RmdifyError {
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage quota exceeded writing '{key}' ({needed} bytes needed, quota is {quota})")]
    QuotaExceeded {
        key: String,
        needed: u64,
        quota: u64,
    },

    #[error("Document {id} was modified elsewhere (expected version {expected}, found {found})")]
    Conflict {
        id: DocumentId,
        expected: u64,
        found: u64,
    },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, RmdifyError>;
