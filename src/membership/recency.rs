//! Bloom filter with per-signature recency
//!
//! The bit array is classic write-once Bloom state: bits are set and never
//! cleared, so the false positive rate only grows as the filter fills. A
//! separate last-seen map layers recency on top, letting "seen" answers
//! expire after a fixed number of logical ticks.

use std::collections::HashMap;

use crate::hash;
use crate::traits::{Mergeable, MergeError, Summary};

/// Outcome of one membership observation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MembershipResult {
    /// All hash positions were already set and the signature was last seen
    /// within the recency window
    pub possibly_seen: bool,
}

/// Recency-aware Bloom filter over string signatures
///
/// # Example
///
/// ```
/// use streamsum::membership::HashedMembershipFilter;
///
/// let mut filter = HashedMembershipFilter::new(1024, 3, 5);
///
/// assert!(!filter.observe("memo_4", 1).possibly_seen);
/// assert!(filter.observe("memo_4", 3).possibly_seen);
///
/// // Seen again, but too long ago
/// assert!(!filter.observe("memo_4", 20).possibly_seen);
/// ```
#[derive(Clone, Debug)]
pub struct HashedMembershipFilter {
    /// Bit array, 64 bits per word
    bits: Vec<u64>,
    /// Number of addressable bits (m)
    num_bits: usize,
    /// Seeds for the k hash functions
    seeds: Vec<u64>,
    /// Ticks within which a signature still counts as recent
    recency_window: u64,
    /// Logical timestamp of the latest observation per signature
    last_seen: HashMap<String, u64>,
    /// Number of observations
    count: u64,
}

impl HashedMembershipFilter {
    /// Create a filter
    ///
    /// # Arguments
    ///
    /// * `num_bits` - Number of bits in the filter (m)
    /// * `num_hashes` - Number of hash functions (k)
    /// * `recency_window` - How many ticks a sighting stays recent
    ///
    /// # Panics
    ///
    /// Panics if `num_bits` is 0 or `num_hashes` is outside `[2, 32]`
    pub fn new(num_bits: usize, num_hashes: usize, recency_window: u64) -> Self {
        assert!(num_bits > 0, "num_bits must be positive");
        assert!(
            (2..=32).contains(&num_hashes),
            "num_hashes must be in [2, 32]"
        );

        let num_words = num_bits.div_ceil(64);
        let seeds: Vec<u64> = (0..num_hashes).map(hash::seed).collect();

        Self {
            bits: vec![0u64; num_words],
            num_bits,
            seeds,
            recency_window,
            last_seen: HashMap::new(),
            count: 0,
        }
    }

    /// Observe a signature at logical time `timestamp`
    ///
    /// The answer is computed before the update: every position is set and the
    /// last-seen time is refreshed regardless of the result.
    pub fn observe(&mut self, signature: &str, timestamp: u64) -> MembershipResult {
        let possibly_seen = self.query(signature, timestamp);

        for &seed in &self.seeds {
            let bit_idx = hash::position(signature.as_bytes(), seed, self.num_bits);
            self.bits[bit_idx / 64] |= 1u64 << (bit_idx % 64);
        }
        self.last_seen.insert(signature.to_owned(), timestamp);
        self.count += 1;

        tracing::trace!(
            target: "streamsum::membership",
            signature,
            timestamp,
            possibly_seen,
            "membership_observe"
        );

        MembershipResult { possibly_seen }
    }

    /// Read-only check of whether `signature` was possibly seen recently as of `now`
    pub fn query(&self, signature: &str, now: u64) -> bool {
        self.all_bits_set(signature) && self.is_recent(signature, now)
    }

    fn all_bits_set(&self, signature: &str) -> bool {
        self.seeds.iter().all(|&seed| {
            let bit_idx = hash::position(signature.as_bytes(), seed, self.num_bits);
            self.bits[bit_idx / 64] & (1u64 << (bit_idx % 64)) != 0
        })
    }

    fn is_recent(&self, signature: &str, now: u64) -> bool {
        match self.last_seen.get(signature) {
            Some(&seen) => now.saturating_sub(seen) <= self.recency_window,
            None => false,
        }
    }

    /// Drop last-seen entries that can no longer count as recent at `now`
    ///
    /// Query answers are unchanged; this only bounds the recency map.
    /// Returns the number of entries removed.
    pub fn expire(&mut self, now: u64) -> usize {
        let before = self.last_seen.len();
        let window = self.recency_window;
        self.last_seen
            .retain(|_, &mut seen| now.saturating_sub(seen) <= window);
        before - self.last_seen.len()
    }

    /// Get the number of bits in the filter
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Get the number of hash functions
    pub fn num_hashes(&self) -> usize {
        self.seeds.len()
    }

    pub fn recency_window(&self) -> u64 {
        self.recency_window
    }

    /// Number of signatures with a tracked last-seen time
    pub fn tracked_signatures(&self) -> usize {
        self.last_seen.len()
    }

    /// Get the number of bits set to 1
    pub fn bits_set(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Estimate the current false positive rate of the bit array alone
    ///
    /// Grows monotonically as the filter fills; this is expected degradation.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        let fill_ratio = self.bits_set() as f64 / self.num_bits as f64;
        fill_ratio.powi(self.seeds.len() as i32)
    }
}

impl Summary for HashedMembershipFilter {
    fn clear(&mut self) {
        for word in &mut self.bits {
            *word = 0;
        }
        self.last_seen.clear();
        self.count = 0;
    }

    fn size_bytes(&self) -> usize {
        let recency: usize = self
            .last_seen
            .keys()
            .map(|k| k.capacity() + core::mem::size_of::<(String, u64)>())
            .sum();
        self.bits.len() * 8 + self.seeds.len() * 8 + recency + 48
    }

    fn count(&self) -> u64 {
        self.count
    }
}

impl Mergeable for HashedMembershipFilter {
    fn merge(&mut self, other: &Self) -> Result<(), MergeError> {
        if self.num_bits != other.num_bits
            || self.seeds.len() != other.seeds.len()
            || self.recency_window != other.recency_window
        {
            return Err(MergeError::IncompatibleConfig {
                expected: format!(
                    "bits={}, hashes={}, window={}",
                    self.num_bits,
                    self.seeds.len(),
                    self.recency_window
                ),
                found: format!(
                    "bits={}, hashes={}, window={}",
                    other.num_bits,
                    other.seeds.len(),
                    other.recency_window
                ),
            });
        }

        for (a, b) in self.bits.iter_mut().zip(other.bits.iter()) {
            *a |= *b;
        }
        for (signature, &seen) in &other.last_seen {
            let entry = self.last_seen.entry(signature.clone()).or_insert(seen);
            *entry = (*entry).max(seen);
        }
        self.count += other.count;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sighting_is_new() {
        let mut filter = HashedMembershipFilter::new(1024, 3, 5);
        assert!(!filter.observe("memo_1", 1).possibly_seen);
        assert_eq!(filter.count(), 1);
        assert!(filter.bits_set() >= 1 && filter.bits_set() <= 3);
    }

    #[test]
    fn test_seen_within_window() {
        let mut filter = HashedMembershipFilter::new(1024, 3, 5);
        filter.observe("report_2", 1);
        assert!(filter.query("report_2", 6));
        assert!(filter.observe("report_2", 6).possibly_seen);
    }

    #[test]
    fn test_expires_after_window() {
        let mut filter = HashedMembershipFilter::new(1024, 3, 5);
        filter.observe("report_2", 1);
        assert!(!filter.query("report_2", 7));
        assert!(!filter.observe("report_2", 7).possibly_seen);
        // The late observation refreshed recency
        assert!(filter.query("report_2", 8));
    }

    #[test]
    fn test_never_observed_is_false() {
        // Tiny filter: bits collide quickly, recency still rules out strangers
        let mut filter = HashedMembershipFilter::new(4, 3, 100);
        for i in 0..50 {
            filter.observe(&format!("sig_{}", i), i);
        }
        assert_eq!(filter.bits_set(), 4);
        assert!(!filter.query("never_seen", 50));
    }

    #[test]
    fn test_no_false_negatives() {
        let mut filter = HashedMembershipFilter::new(4096, 3, 10);
        for i in 0..500u64 {
            filter.observe(&format!("item_{}", i), i);
        }
        for i in 490..500u64 {
            assert!(filter.query(&format!("item_{}", i), 500), "Missing item_{}", i);
        }
    }

    #[test]
    fn test_false_positive_rate_grows() {
        let mut filter = HashedMembershipFilter::new(256, 3, 10);
        let mut last = filter.estimated_false_positive_rate();
        assert_eq!(last, 0.0);
        for i in 0..200u64 {
            filter.observe(&format!("item_{}", i), i);
            let rate = filter.estimated_false_positive_rate();
            assert!(rate >= last);
            last = rate;
        }
        assert!(last > 0.0);
    }

    #[test]
    fn test_expire() {
        let mut filter = HashedMembershipFilter::new(1024, 3, 5);
        filter.observe("old", 1);
        filter.observe("fresh", 9);
        assert_eq!(filter.expire(10), 1);
        assert_eq!(filter.tracked_signatures(), 1);
        assert!(filter.query("fresh", 10));
        assert!(!filter.query("old", 10));
    }

    #[test]
    fn test_merge() {
        let mut a = HashedMembershipFilter::new(1024, 3, 5);
        let mut b = HashedMembershipFilter::new(1024, 3, 5);
        a.observe("memo_1", 1);
        b.observe("memo_1", 4);
        b.observe("email_9", 3);

        a.merge(&b).unwrap();

        assert!(a.query("email_9", 6));
        // Latest sighting wins
        assert!(a.query("memo_1", 9));
        assert_eq!(a.count(), 3);
    }

    #[test]
    fn test_merge_incompatible() {
        let mut a = HashedMembershipFilter::new(1024, 3, 5);
        let b = HashedMembershipFilter::new(2048, 3, 5);
        assert!(a.merge(&b).is_err());
    }

    #[test]
    fn test_clear() {
        let mut filter = HashedMembershipFilter::new(64, 2, 5);
        filter.observe("memo_1", 1);
        filter.clear();
        assert!(filter.is_empty());
        assert_eq!(filter.bits_set(), 0);
        assert!(!filter.query("memo_1", 1));
    }

    #[test]
    #[should_panic(expected = "num_hashes")]
    fn test_single_hash_rejected() {
        HashedMembershipFilter::new(64, 1, 5);
    }
}
