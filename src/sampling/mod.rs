//! Stream sampling algorithms
//!
//! This module keeps a bounded sample of users from a stream of unknown
//! length. Users are chosen by hash rather than by chance, so a user that is
//! in the sample keeps every one of its events and a user that was dropped
//! never comes back.
//!
//! # Example
//!
//! ```
//! use streamsum::sampling::AdaptiveSampleSet;
//!
//! let mut sample = AdaptiveSampleSet::new(100, 10, 31, 17);
//!
//! for i in 0..10_000u64 {
//!     sample.observe(i % 500 + 1, i);
//! }
//!
//! assert!(sample.len() <= 10);
//! ```

mod adaptive;

pub use adaptive::{AdaptiveSampleSet, Decision, Route};
