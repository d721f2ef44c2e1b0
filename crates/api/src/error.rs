#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("cannot build a filter over an empty identifier set")]
    Empty,
    #[error("filter for {identifiers} identifiers needs {bits} bits (limit {limit})")]
    TooLarge {
        identifiers: usize,
        bits: usize,
        limit: usize,
    },
    #[error("filter encoding failed: {0}")]
    Encode(String),
    #[error("filter decoding failed: {0}")]
    Decode(String),
}

pub type FilterResult<T> = std::result::Result<T, FilterError>;
