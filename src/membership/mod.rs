//! Approximate membership with recency
//!
//! This module answers "was a similar signature seen recently?" with a Bloom
//! filter whose bits are permanent and a last-seen map that lets answers
//! expire. False positives are possible; false negatives within the recency
//! window are not.
//!
//! # Example
//!
//! ```
//! use streamsum::membership::HashedMembershipFilter;
//!
//! let mut filter = HashedMembershipFilter::new(1024, 3, 5);
//! filter.observe("report_3", 1);
//! assert!(filter.query("report_3", 2));
//! ```

mod recency;

pub use recency::{HashedMembershipFilter, MembershipResult};
