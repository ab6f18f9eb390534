//! First frequency moment
//!
//! Sums a non-negative weight over the whole stream in O(1) time and memory.
//! The sum is exact and independent of arrival order, which makes it a fixed
//! anchor for checking the approximate summaries.

use crate::error::InputError;
use crate::traits::{Mergeable, MergeError, Summary};

/// Running first moment (F1) of a stream of non-negative integers
///
/// Alongside the sum it keeps the count, minimum and maximum of the accepted
/// values. Negative values are rejected and contribute nothing.
///
/// # Example
///
/// ```
/// use streamsum::statistics::MomentAccumulator;
///
/// let mut f1 = MomentAccumulator::new();
///
/// for value in [12, 40, 7] {
///     f1.observe(value).unwrap();
/// }
/// assert!(f1.observe(-1).is_err());
///
/// assert_eq!(f1.query(), 59);
/// assert_eq!(f1.len(), 3);
/// assert_eq!(f1.min(), Some(7));
/// ```
///
/// # Distributed Usage
///
/// ```
/// use streamsum::statistics::MomentAccumulator;
/// use streamsum::traits::Mergeable;
///
/// let mut shard1 = MomentAccumulator::new();
/// let mut shard2 = MomentAccumulator::new();
///
/// shard1.observe(10).unwrap();
/// shard2.observe(32).unwrap();
///
/// shard1.merge(&shard2).unwrap();
/// assert_eq!(shard1.query(), 42);
/// ```
#[derive(Clone, Debug)]
pub struct MomentAccumulator {
    /// Sum of accepted values
    sum: u64,
    /// Number of accepted values
    count: u64,
    /// Minimum accepted value
    min: u64,
    /// Maximum accepted value
    max: u64,
    /// Number of rejected (negative) values
    rejected: u64,
}

impl Default for MomentAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl MomentAccumulator {
    /// Create a new empty accumulator
    pub fn new() -> Self {
        Self {
            sum: 0,
            count: 0,
            min: u64::MAX,
            max: 0,
            rejected: 0,
        }
    }

    /// Add a value to the running sum
    ///
    /// Negative values are skipped (treated as zero weight) and reported.
    pub fn observe(&mut self, value: i64) -> Result<(), InputError> {
        let value = match u64::try_from(value) {
            Ok(v) => v,
            Err(_) => {
                self.rejected += 1;
                return Err(InputError::NegativeFrequency(value));
            }
        };

        self.count += 1;
        self.sum = self.sum.saturating_add(value);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        Ok(())
    }

    /// Get the first moment (sum of all accepted values)
    pub fn query(&self) -> u64 {
        self.sum
    }

    /// Get the number of accepted values
    pub fn len(&self) -> u64 {
        self.count
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of values rejected as negative
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Get the mean of accepted values
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum as f64 / self.count as f64
        }
    }

    /// Get the minimum accepted value
    pub fn min(&self) -> Option<u64> {
        if self.count == 0 {
            None
        } else {
            Some(self.min)
        }
    }

    /// Get the maximum accepted value
    pub fn max(&self) -> Option<u64> {
        if self.count == 0 {
            None
        } else {
            Some(self.max)
        }
    }
}

impl Summary for MomentAccumulator {
    fn clear(&mut self) {
        *self = Self::new();
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>()
    }

    fn count(&self) -> u64 {
        self.count
    }
}

impl Mergeable for MomentAccumulator {
    fn merge(&mut self, other: &Self) -> Result<(), MergeError> {
        self.sum = self.sum.saturating_add(other.sum);
        self.count += other.count;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.rejected += other.rejected;
        Ok(())
    }
}
