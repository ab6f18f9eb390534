//! Versioned hash functions
//!
//! Positions and buckets must be reproducible across runs and processes, so
//! nothing here goes through `std::hash::Hash` or a randomly seeded hasher.

use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Bumped whenever any function in this module changes its output
pub const HASH_VERSION: u32 = 1;

const SEED_STEP: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seed for the `index`-th membership hash function
#[inline]
pub fn seed(index: usize) -> u64 {
    (index as u64 + 1).wrapping_mul(SEED_STEP)
}

/// Bit position in `[0, num_bits)` for one seeded hash of `bytes`
#[inline]
pub fn position(bytes: &[u8], seed: u64, num_bits: usize) -> usize {
    (xxh3_64_with_seed(bytes, seed) % num_bits as u64) as usize
}

/// Linear bucket hash `(a * key + c) mod buckets`
#[inline]
pub fn linear_bucket(key: u64, a: u64, c: u64, buckets: u64) -> u64 {
    ((a as u128 * key as u128 + c as u128) % buckets as u128) as u64
}

/// Shard index for a user id, for callers partitioning a stream
#[inline]
pub fn shard_for(user_id: u64, shards: usize) -> usize {
    (xxh3_64_with_seed(&user_id.to_le_bytes(), 0) % shards.max(1) as u64) as usize
}
