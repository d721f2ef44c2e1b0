use lsif_bundle_api::FilterError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Bundle encoding error: {0}")]
    Codec(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Gathering package references failed for {scheme}:{name}@{version}: {source}")]
    PackageReferences {
        scheme: String,
        name: String,
        version: String,
        #[source]
        source: FilterError,
    },
    #[error("{producer} producer stopped before finishing: {reason}")]
    Producer { producer: String, reason: String },
    #[error("Bundle task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("Logging setup failed: {0}")]
    Logging(String),
    #[error("Bundle build cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, BundleError>;
