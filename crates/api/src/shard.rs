//! Result chunk addressing shared by bundle writers and readers.

use crate::models::Id;

/// Upper bound on the number of result chunks in one bundle.
pub const MAX_NUM_RESULT_CHUNKS: usize = 1000;

/// Target number of definition/reference results per chunk.
pub const RESULTS_PER_RESULT_CHUNK: usize = 500;

/// Number of result chunks for a bundle holding `num_results` results.
pub fn num_result_chunks(num_results: usize) -> usize {
    (num_results / RESULTS_PER_RESULT_CHUNK).clamp(1, MAX_NUM_RESULT_CHUNKS)
}

/// Index of the chunk that holds `id` in a bundle with `max_index` chunks.
///
/// This is the 32-bit `(h << 5) - h + c` string hash, so chunk indexes agree
/// with every other reader of the same bundle format. Readers recompute the
/// index from the id, so the function must never change.
pub fn hash_key(id: &Id, max_index: usize) -> usize {
    let mut hash: i32 = 0;
    for c in id.as_str().chars() {
        hash = (hash << 5).wrapping_sub(hash).wrapping_add(c as i32);
    }
    hash.unsigned_abs() as usize % max_index.max(1)
}
