//! Sliding-window counting
//!
//! This module counts events inside a window of the most recent arrivals,
//! in space logarithmic in the window length.
//!
//! # Example
//!
//! ```
//! use streamsum::window::SlidingWindowCounter;
//! use streamsum::traits::CountEstimate;
//!
//! let mut dgim = SlidingWindowCounter::new(32);
//!
//! for i in 0..1000u64 {
//!     dgim.observe(i % 4 == 0);
//! }
//!
//! // 8 of the last 32 arrivals were 1-bits
//! let bounds = dgim.estimate_with_bounds();
//! assert!(bounds.contains(8.0));
//! ```

mod dgim;

pub use dgim::{Bucket, SlidingWindowCounter};
