//! Membership filters over the identifiers a bundle imports from a package.
//!
//! A filter answers "might this package reference contain identifier X" with
//! no false negatives. Filters are sized for [`TARGET_FALSE_POSITIVE_RATE`] and
//! stored as zstd-compressed MessagePack so readers only need the blob.

use crate::error::{FilterError, FilterResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use xxhash_rust::xxh3::xxh3_64_with_seed;

pub const TARGET_FALSE_POSITIVE_RATE: f64 = 0.01;

/// Largest filter we are willing to build (8 MiB of bits).
pub const MAX_NUM_BITS: usize = 1 << 26;

const SECOND_HASH_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BloomFilter {
    num_hash_functions: u32,
    buckets: Vec<u32>,
}

impl BloomFilter {
    /// Creates an empty filter sized for `capacity` distinct entries.
    pub fn with_capacity(capacity: usize, false_positive_rate: f64) -> FilterResult<Self> {
        Self::with_capacity_and_limit(capacity, false_positive_rate, MAX_NUM_BITS)
    }

    /// Like [`BloomFilter::with_capacity`], refusing filters wider than `max_num_bits`.
    pub fn with_capacity_and_limit(
        capacity: usize,
        false_positive_rate: f64,
        max_num_bits: usize,
    ) -> FilterResult<Self> {
        if capacity == 0 {
            return Err(FilterError::Empty);
        }

        let n = capacity as f64;
        let ln2 = std::f64::consts::LN_2;
        let optimal_bits = (-(n * false_positive_rate.ln()) / (ln2 * ln2)).ceil() as usize;
        let num_bits = optimal_bits.max(32).div_ceil(32) * 32;
        if num_bits > max_num_bits {
            return Err(FilterError::TooLarge {
                identifiers: capacity,
                bits: num_bits,
                limit: max_num_bits,
            });
        }

        let num_hash_functions = ((num_bits as f64 / n) * ln2).round().max(1.0) as u32;

        Ok(Self {
            num_hash_functions,
            buckets: vec![0; num_bits / 32],
        })
    }

    pub fn num_bits(&self) -> usize {
        self.buckets.len() * 32
    }

    pub fn num_hash_functions(&self) -> u32 {
        self.num_hash_functions
    }

    pub fn insert(&mut self, value: &str) {
        for bit in bit_locations(self.num_bits(), self.num_hash_functions, value) {
            self.buckets[bit / 32] |= 1 << (bit % 32);
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        bit_locations(self.num_bits(), self.num_hash_functions, value)
            .all(|bit| self.buckets[bit / 32] & (1 << (bit % 32)) != 0)
    }

    pub fn encode(&self) -> FilterResult<Vec<u8>> {
        let bytes = rmp_serde::to_vec(self).map_err(|e| FilterError::Encode(e.to_string()))?;
        zstd::encode_all(&bytes[..], 0).map_err(|e| FilterError::Encode(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> FilterResult<Self> {
        let decompressed = zstd::decode_all(bytes).map_err(|e| FilterError::Decode(e.to_string()))?;
        let filter: Self = rmp_serde::from_slice(&decompressed)
            .map_err(|e| FilterError::Decode(e.to_string()))?;
        if filter.buckets.is_empty() || filter.num_hash_functions == 0 {
            return Err(FilterError::Decode("degenerate filter".to_string()));
        }
        Ok(filter)
    }
}

// Kirsch-Mitzenmacher double hashing: bit_i = h1 + i * h2.
fn bit_locations(
    num_bits: usize,
    num_hash_functions: u32,
    value: &str,
) -> impl Iterator<Item = usize> + use<> {
    let num_bits = num_bits as u64;
    let h1 = xxh3_64_with_seed(value.as_bytes(), 0);
    let h2 = xxh3_64_with_seed(value.as_bytes(), SECOND_HASH_SEED) | 1;
    (0..u64::from(num_hash_functions))
        .map(move |i| (h1.wrapping_add(i.wrapping_mul(h2)) % num_bits) as usize)
}

/// Builds an encoded filter containing every identifier.
pub fn create_filter<S: AsRef<str>>(identifiers: &[S]) -> FilterResult<Vec<u8>> {
    create_filter_with_limit(identifiers, MAX_NUM_BITS)
}

pub fn create_filter_with_limit<S: AsRef<str>>(
    identifiers: &[S],
    max_num_bits: usize,
) -> FilterResult<Vec<u8>> {
    let distinct: HashSet<&str> = identifiers.iter().map(AsRef::as_ref).collect();

    let mut filter = BloomFilter::with_capacity_and_limit(
        distinct.len(),
        TARGET_FALSE_POSITIVE_RATE,
        max_num_bits,
    )?;
    for identifier in distinct {
        filter.insert(identifier);
    }
    filter.encode()
}

pub fn decode_filter(bytes: &[u8]) -> FilterResult<BloomFilter> {
    BloomFilter::decode(bytes)
}

/// Tests `identifier` against an encoded filter.
pub fn test_filter(bytes: &[u8], identifier: &str) -> FilterResult<bool> {
    Ok(BloomFilter::decode(bytes)?.contains(identifier))
}
