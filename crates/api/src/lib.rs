pub mod bloomfilter;
pub mod error;
pub mod models;
pub mod shard;

// Re-export commonly used types
pub use bloomfilter::{
    BloomFilter, create_filter, create_filter_with_limit, decode_filter, test_filter,
};
pub use error::FilterError;
pub use models::*;
pub use shard::{MAX_NUM_RESULT_CHUNKS, RESULTS_PER_RESULT_CHUNK, hash_key, num_result_chunks};
