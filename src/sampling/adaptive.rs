//! Sticky sampling with a shrinking hash threshold
//!
//! Users are hashed into `b` buckets with a fixed linear hash. A user is
//! sampled while its bucket is at or below the current threshold; whenever
//! the sample holds more users than allowed, every user in the threshold
//! bucket is dropped and the threshold moves down by one. Inclusion thus
//! depends only on the user, so a sampled user keeps all of its events.

use std::collections::BTreeMap;

use crate::hash;
use crate::traits::Summary;

/// Outcome of one sampling observation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    pub accepted: bool,
}

/// Route assigned to a user by its latest sampling decision
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Route {
    /// The user was accepted into the sample
    Priority,
    /// The user was rejected
    Normal,
}

/// Bounded per-user sample with adaptive acceptance threshold
///
/// # Example
///
/// ```
/// use streamsum::sampling::AdaptiveSampleSet;
///
/// let mut sample = AdaptiveSampleSet::new(10, 3, 3, 7);
///
/// for user in 1..=15u64 {
///     sample.observe(user, user * 100);
/// }
///
/// assert!(sample.len() <= 3);
/// assert!(sample.threshold() < 9);
/// ```
#[derive(Clone, Debug)]
pub struct AdaptiveSampleSet<P: Clone + core::fmt::Debug> {
    /// Number of hash buckets (b)
    buckets: u64,
    /// Maximum number of distinct users kept
    limit: usize,
    /// Hash multiplier (a)
    multiplier: u64,
    /// Hash offset (c)
    offset: u64,
    /// Highest bucket still accepted
    threshold: u64,
    /// Accepted payloads per user, in arrival order
    sample: BTreeMap<u64, Vec<P>>,
    /// Route from each user's latest decision
    routes: BTreeMap<u64, Route>,
    /// Number of observations
    count: u64,
}

impl<P: Clone + core::fmt::Debug> AdaptiveSampleSet<P> {
    /// Create a sample set
    ///
    /// # Arguments
    ///
    /// * `buckets` - Number of hash buckets (b); the threshold starts at `b - 1`
    /// * `limit` - Maximum number of users in the sample
    /// * `multiplier` - Hash multiplier (a)
    /// * `offset` - Hash offset (c)
    ///
    /// # Panics
    ///
    /// Panics if `buckets` or `limit` is 0
    pub fn new(buckets: u64, limit: usize, multiplier: u64, offset: u64) -> Self {
        assert!(buckets > 0, "buckets must be positive");
        assert!(limit > 0, "limit must be positive");

        Self {
            buckets,
            limit,
            multiplier,
            offset,
            threshold: buckets - 1,
            sample: BTreeMap::new(),
            routes: BTreeMap::new(),
            count: 0,
        }
    }

    /// Bucket of a user under this set's hash
    pub fn bucket_of(&self, user_id: u64) -> u64 {
        hash::linear_bucket(user_id, self.multiplier, self.offset, self.buckets)
    }

    /// Offer one payload for `user_id`
    pub fn observe(&mut self, user_id: u64, payload: P) -> Decision {
        self.count += 1;

        let bucket = self.bucket_of(user_id);
        let accepted = bucket <= self.threshold;
        if accepted {
            self.sample.entry(user_id).or_default().push(payload);
            self.routes.insert(user_id, Route::Priority);
        } else {
            self.routes.insert(user_id, Route::Normal);
        }

        tracing::trace!(
            target: "streamsum::sampling",
            user_id,
            bucket,
            threshold = self.threshold,
            accepted,
            "sample_observe"
        );

        self.shrink();
        Decision { accepted }
    }

    /// Evict threshold buckets until the sample fits or the threshold bottoms out
    fn shrink(&mut self) {
        while self.sample.len() > self.limit && self.threshold > 0 {
            let threshold = self.threshold;
            let (multiplier, offset, buckets) = (self.multiplier, self.offset, self.buckets);
            let before = self.sample.len();
            self.sample
                .retain(|&user, _| hash::linear_bucket(user, multiplier, offset, buckets) != threshold);
            self.threshold -= 1;

            tracing::debug!(
                target: "streamsum::sampling",
                evicted = before - self.sample.len(),
                threshold = self.threshold,
                "sample_threshold_lowered"
            );
        }

        if self.is_saturated() {
            tracing::warn!(
                target: "streamsum::sampling",
                size = self.sample.len(),
                limit = self.limit,
                "sample oversized at threshold floor"
            );
        }
    }

    /// Current acceptance threshold
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// The threshold hit 0 while the sample still exceeds its limit
    ///
    /// Happens only when more than `limit` users share bucket 0. No further
    /// eviction is attempted in this state.
    pub fn is_saturated(&self) -> bool {
        self.threshold == 0 && self.sample.len() > self.limit
    }

    /// Sampled users and their payloads
    pub fn sample(&self) -> &BTreeMap<u64, Vec<P>> {
        &self.sample
    }

    /// Payloads kept for one user
    pub fn payloads(&self, user_id: u64) -> Option<&[P]> {
        self.sample.get(&user_id).map(Vec::as_slice)
    }

    pub fn contains(&self, user_id: u64) -> bool {
        self.sample.contains_key(&user_id)
    }

    /// Route from the user's latest decision
    pub fn route(&self, user_id: u64) -> Option<Route> {
        self.routes.get(&user_id).copied()
    }

    pub fn routes(&self) -> &BTreeMap<u64, Route> {
        &self.routes
    }

    /// Number of sampled users
    pub fn len(&self) -> usize {
        self.sample.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sample.is_empty()
    }

    /// Maximum number of sampled users
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn buckets(&self) -> u64 {
        self.buckets
    }
}

impl<P: Clone + core::fmt::Debug> Summary for AdaptiveSampleSet<P> {
    fn clear(&mut self) {
        self.sample.clear();
        self.routes.clear();
        self.threshold = self.buckets - 1;
        self.count = 0;
    }

    fn size_bytes(&self) -> usize {
        let payloads: usize = self
            .sample
            .values()
            .map(|v| v.capacity() * core::mem::size_of::<P>() + 32)
            .sum();
        payloads + self.routes.len() * 16 + 64
    }

    fn count(&self) -> u64 {
        self.count
    }
}
