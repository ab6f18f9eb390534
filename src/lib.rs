//! # Streamsum
//!
//! Single-pass summaries of an unbounded event stream.
//!
//! Streamsum keeps five independent summaries over one ordered feed of
//! document-interaction events, each under strict memory and one-pass
//! constraints, and never looks ahead or replays.
//!
//! ## Features
//!
//! - **Recency Membership**: Bloom filter answering "seen a similar event lately?"
//! - **Adaptive Sampling**: Bounded per-user sample with a shrinking hash threshold
//! - **Exact Cardinality**: Per-user distinct and total counts, the ground truth
//! - **Frequency Moments**: Running first moment (F1) of a numeric field
//! - **Sliding Windows**: DGIM count of 1-bits among the last `W` arrivals
//! - **Mergeability**: Order-independent summaries merge across shards
//!
//! ## Quick Start
//!
//! ```rust
//! use streamsum::prelude::*;
//!
//! let mut engine = StreamDispatcher::new(EngineConfig::default()).unwrap();
//!
//! for (kind, freq, user) in [("memo", 12, 5), ("report", 40, 2), ("memo", 15, 5)] {
//!     engine.ingest(EventRecord::new(kind, freq, user)).unwrap();
//! }
//!
//! assert_eq!(engine.query_cardinality(5), (1, 2));
//! assert_eq!(engine.query_moment(), 67);
//! assert!(engine.query_window_bounds().contains(3.0));
//! ```
//!
//! ## Feature Flags
//!
//! Algorithm families:
//! - `membership` (default): Recency-aware Bloom filter
//! - `sampling` (default): Adaptive sticky sampling
//! - `cardinality` (default): Exact distinct counting
//! - `statistics` (default): First frequency moment
//! - `windowing` (default): DGIM sliding-window counting
//! - `engine` (default): Dispatcher over all of the above
//! - `full`: Everything, plus `serde`
//!
//! Platform features:
//! - `serde`: Enable serialization of events, configuration and snapshots

#![cfg_attr(docsrs, feature(doc_cfg))]

// Always available
pub mod error;
pub mod event;
pub mod hash;
pub mod traits;

#[cfg(feature = "membership")]
#[cfg_attr(docsrs, doc(cfg(feature = "membership")))]
pub mod membership;

#[cfg(feature = "sampling")]
#[cfg_attr(docsrs, doc(cfg(feature = "sampling")))]
pub mod sampling;

#[cfg(feature = "cardinality")]
#[cfg_attr(docsrs, doc(cfg(feature = "cardinality")))]
pub mod cardinality;

#[cfg(feature = "statistics")]
#[cfg_attr(docsrs, doc(cfg(feature = "statistics")))]
pub mod statistics;

#[cfg(feature = "windowing")]
#[cfg_attr(docsrs, doc(cfg(feature = "windowing")))]
pub mod window;

#[cfg(feature = "engine")]
#[cfg_attr(docsrs, doc(cfg(feature = "engine")))]
pub mod engine;

pub mod prelude {
    pub use crate::error::{EngineError, InputError};
    pub use crate::event::EventRecord;
    pub use crate::traits::*;

    #[cfg(feature = "membership")]
    pub use crate::membership::HashedMembershipFilter;

    #[cfg(feature = "sampling")]
    pub use crate::sampling::AdaptiveSampleSet;

    #[cfg(feature = "cardinality")]
    pub use crate::cardinality::ExactCardinalityTracker;

    #[cfg(feature = "statistics")]
    pub use crate::statistics::MomentAccumulator;

    #[cfg(feature = "windowing")]
    pub use crate::window::SlidingWindowCounter;

    #[cfg(feature = "engine")]
    pub use crate::engine::{EngineConfig, SharedEngine, StreamDispatcher};
}

#[cfg(feature = "engine")]
pub use engine::{EngineConfig, SharedEngine, StreamDispatcher};
