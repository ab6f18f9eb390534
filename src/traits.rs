//! Core traits for stream summaries
//!
//! Every summary implements the base [`Summary`] trait. Summaries whose state
//! does not depend on arrival order also implement [`Mergeable`], so a stream
//! sharded across independent engines can be recombined at query time.

use core::fmt::Debug;

use thiserror::Error;

/// Error during summary merge operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    /// Summaries have incompatible configurations
    #[error("incompatible config: expected {expected}, found {found}")]
    IncompatibleConfig { expected: String, found: String },
}

/// Deterministic bounds around an estimate
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorBounds {
    /// Lower bound of the true value
    pub lower: f64,
    /// Point estimate
    pub estimate: f64,
    /// Upper bound of the true value
    pub upper: f64,
}

impl ErrorBounds {
    /// Create new error bounds
    pub fn new(lower: f64, estimate: f64, upper: f64) -> Self {
        Self {
            lower,
            estimate,
            upper,
        }
    }

    /// Bounds collapsed onto an exact value
    pub fn exact(value: f64) -> Self {
        Self::new(value, value, value)
    }

    /// Check if a value falls within bounds
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Width of the interval
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Relative width (width / estimate)
    pub fn relative_width(&self) -> f64 {
        if self.estimate == 0.0 {
            0.0
        } else {
            self.width() / self.estimate
        }
    }
}

/// Core trait for all stream summaries
///
/// Inputs differ per summary (a signature, a user/payload pair, a bit), so
/// `observe` lives on each type; this trait covers the shared bookkeeping.
pub trait Summary: Clone + Debug {
    /// Reset summary to its freshly constructed state
    fn clear(&mut self);

    /// Approximate memory usage in bytes
    fn size_bytes(&self) -> usize;

    /// Number of observations processed
    fn count(&self) -> u64;

    /// Check if nothing has been observed
    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// Summaries that can absorb another instance built over a disjoint shard
pub trait Mergeable: Summary {
    /// Merge another summary into this one
    ///
    /// Returns an error if the summaries were built with different parameters
    fn merge(&mut self, other: &Self) -> Result<(), MergeError>;
}

/// Summaries answering an approximate count
pub trait CountEstimate: Summary {
    /// Point estimate of the count
    fn estimate(&self) -> f64;

    /// Bounds known to contain the true count
    fn estimate_with_bounds(&self) -> ErrorBounds;
}
