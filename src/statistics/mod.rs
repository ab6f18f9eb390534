//! Frequency moments for streaming data
//!
//! This module computes moments over streams in a single pass with constant
//! memory.
//!
//! # Example
//!
//! ```
//! use streamsum::statistics::MomentAccumulator;
//!
//! let mut f1 = MomentAccumulator::new();
//!
//! for value in [40, 2, 17] {
//!     f1.observe(value).unwrap();
//! }
//!
//! println!("F1: {}", f1.query());
//! println!("Mean: {}", f1.mean());
//! ```

mod moments;

pub use moments::MomentAccumulator;
