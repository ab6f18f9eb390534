//! DGIM sliding-window bit counting
//!
//! Counts the 1-bits among the last `W` arrivals with O(log² W) space by
//! grouping them into buckets whose sizes are powers of two. At most two
//! buckets of any one size exist at a time, which bounds the error of the
//! estimate to half the oldest bucket.

use std::collections::VecDeque;

use crate::traits::{CountEstimate, ErrorBounds, Summary};

/// A run of 1-bits, identified by the timestamp of its most recent bit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bucket {
    /// Number of 1-bits covered, always a power of two
    pub size: u64,
    /// Logical time of the most recent 1-bit in the bucket
    pub end_timestamp: u64,
}

/// Approximate count of 1-bits in the last `window_size` arrivals
///
/// # Example
///
/// ```
/// use streamsum::window::SlidingWindowCounter;
/// use streamsum::traits::CountEstimate;
///
/// let mut dgim = SlidingWindowCounter::new(5);
/// for bit in [true, true, true, false, true] {
///     dgim.observe(bit);
/// }
///
/// // Four 1-bits in the window; the oldest bucket is half-counted
/// assert_eq!(dgim.estimate(), 3.0);
/// assert!(dgim.estimate_with_bounds().contains(4.0));
/// ```
#[derive(Clone, Debug)]
pub struct SlidingWindowCounter {
    /// Window length in arrivals (W)
    window_size: u64,
    /// Logical clock, advanced once per observation
    clock: u64,
    /// Buckets, most recent at the front
    buckets: VecDeque<Bucket>,
}

impl SlidingWindowCounter {
    /// Create a counter over the last `window_size` arrivals
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is 0
    pub fn new(window_size: u64) -> Self {
        assert!(window_size > 0, "window_size must be positive");

        Self {
            window_size,
            clock: 0,
            buckets: VecDeque::new(),
        }
    }

    /// Observe the next bit of the stream
    pub fn observe(&mut self, bit: bool) {
        self.clock += 1;
        self.evict();

        if !bit {
            return;
        }

        self.buckets.push_front(Bucket {
            size: 1,
            end_timestamp: self.clock,
        });
        self.merge_cascade();

        tracing::trace!(
            target: "streamsum::window",
            clock = self.clock,
            buckets = self.buckets.len(),
            "window_observe"
        );
    }

    /// Drop buckets whose newest bit has left the window
    fn evict(&mut self) {
        let Some(horizon) = self.clock.checked_sub(self.window_size) else {
            return;
        };
        while let Some(oldest) = self.buckets.back() {
            if oldest.end_timestamp > horizon {
                break;
            }
            self.buckets.pop_back();
        }
    }

    /// Merge the two older buckets of every run of three equal sizes
    ///
    /// The scan stays on the same index after a merge, since the merged
    /// bucket can form a new triple with the two after it.
    fn merge_cascade(&mut self) {
        let mut idx = 0;
        while idx + 2 < self.buckets.len() {
            let size = self.buckets[idx].size;
            if self.buckets[idx + 1].size != size || self.buckets[idx + 2].size != size {
                idx += 1;
                continue;
            }

            let newer = self.buckets[idx + 1];
            self.buckets[idx + 1] = Bucket {
                size: newer.size * 2,
                end_timestamp: newer.end_timestamp,
            };
            self.buckets.remove(idx + 2);

            tracing::debug!(
                target: "streamsum::window",
                size = newer.size * 2,
                end_timestamp = newer.end_timestamp,
                "window_bucket_merged"
            );
        }
    }

    /// Current buckets, most recent first
    pub fn buckets(&self) -> impl ExactSizeIterator<Item = &Bucket> {
        self.buckets.iter()
    }

    pub fn window_size(&self) -> u64 {
        self.window_size
    }

    /// Number of bits observed so far
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Largest number of buckets sharing one size
    pub fn max_buckets_per_size(&self) -> usize {
        let mut max = 0;
        let mut run = 0;
        let mut prev = None;
        // Sizes are non-decreasing front to back, so equal sizes are adjacent
        for bucket in &self.buckets {
            if prev == Some(bucket.size) {
                run += 1;
            } else {
                run = 1;
                prev = Some(bucket.size);
            }
            max = max.max(run);
        }
        max
    }

    fn total(&self) -> u64 {
        self.buckets.iter().map(|b| b.size).sum()
    }

    /// Size of the oldest bucket if it may straddle the window boundary
    ///
    /// A size-1 bucket holds a single bit at its end timestamp, which is
    /// inside the window, so it is never partial.
    fn partial_size(&self) -> u64 {
        match self.buckets.back() {
            Some(b) if b.size > 1 => b.size,
            _ => 0,
        }
    }
}

impl CountEstimate for SlidingWindowCounter {
    /// Sum of bucket sizes with the oldest multi-bit bucket half-counted
    fn estimate(&self) -> f64 {
        self.total() as f64 - self.partial_size() as f64 / 2.0
    }

    fn estimate_with_bounds(&self) -> ErrorBounds {
        let total = self.total();
        let partial = self.partial_size();
        // At least the newest bit of a partial bucket is in the window
        let lower = total - partial.saturating_sub(1);
        ErrorBounds::new(lower as f64, self.estimate(), total as f64)
    }
}

impl Summary for SlidingWindowCounter {
    fn clear(&mut self) {
        self.clock = 0;
        self.buckets.clear();
    }

    fn size_bytes(&self) -> usize {
        self.buckets.capacity() * core::mem::size_of::<Bucket>() + 32
    }

    fn count(&self) -> u64 {
        self.clock
    }
}
