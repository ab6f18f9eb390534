//! Exact cardinality tracking
//!
//! This module provides exact per-user distinct counting. It is unbounded by
//! design and serves as the reference the approximate summaries are
//! validated against.
//!
//! # Example
//!
//! ```
//! use streamsum::cardinality::ExactCardinalityTracker;
//!
//! let mut tracker = ExactCardinalityTracker::new();
//! for kind in ["memo", "report", "memo"] {
//!     tracker.observe(7, kind);
//! }
//!
//! let (distinct, total) = tracker.query(7);
//! assert_eq!((distinct, total), (2, 3));
//! ```

mod exact;

pub use exact::ExactCardinalityTracker;
