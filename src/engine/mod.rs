//! Streaming summarization engine
//!
//! A [`StreamDispatcher`] owns one instance of every summary and feeds each
//! of them from a single ordered stream of [`EventRecord`](crate::event::EventRecord)s.
//! [`SharedEngine`] wraps it for use across threads.
//!
//! The lifecycle is construct, ingest any number of events, close. After
//! closing, ingestion fails with [`EngineError::InvalidState`](crate::error::EngineError::InvalidState)
//! while every query keeps working.
//!
//! # Example
//!
//! ```
//! use streamsum::engine::{EngineConfig, StreamDispatcher};
//! use streamsum::event::EventRecord;
//!
//! let mut engine = StreamDispatcher::new(EngineConfig::default()).unwrap();
//!
//! let snapshot = engine.ingest(EventRecord::new("presentation", 73, 9)).unwrap();
//! assert_eq!(snapshot.timestamp, 1);
//! assert_eq!(snapshot.signature, "presentation_7");
//! assert!(!snapshot.membership.possibly_seen);
//! ```

mod config;
mod dispatcher;
mod shared;
mod snapshot;

pub use config::{EngineConfig, WindowBit};
pub use dispatcher::{DispatcherState, StreamDispatcher};
pub use shared::SharedEngine;
pub use snapshot::Snapshot;
