use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("producer cancelled")]
    Cancelled,
    #[error("consumer of {0} went away")]
    Closed(String),
    #[error("producer task failed: {0}")]
    Join(String),
}
