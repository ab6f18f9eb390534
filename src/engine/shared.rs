//! Thread-safe handle around a dispatcher
//!
//! Ingests are serialized behind a write lock; queries share a read lock, so
//! they may overlap each other but never an in-flight ingest. For more
//! throughput, run one engine per shard (see [`crate::hash::shard_for`])
//! instead of contending on a single instance.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::event::EventRecord;
use crate::sampling::Route;

use super::config::EngineConfig;
use super::dispatcher::StreamDispatcher;
use super::snapshot::Snapshot;

/// Cloneable, `Send + Sync` engine handle
///
/// # Example
///
/// ```
/// use streamsum::engine::{EngineConfig, SharedEngine};
/// use streamsum::event::EventRecord;
///
/// let engine = SharedEngine::new(EngineConfig::default()).unwrap();
/// let reader = engine.clone();
///
/// engine.ingest(EventRecord::new("email", 25, 3)).unwrap();
/// assert_eq!(reader.query_moment(), 25);
/// ```
#[derive(Clone, Debug)]
pub struct SharedEngine {
    inner: Arc<RwLock<StreamDispatcher>>,
}

impl SharedEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        Ok(Self::from_dispatcher(StreamDispatcher::new(config)?))
    }

    pub fn from_dispatcher(dispatcher: StreamDispatcher) -> Self {
        Self {
            inner: Arc::new(RwLock::new(dispatcher)),
        }
    }

    pub fn ingest(&self, record: EventRecord) -> Result<Snapshot> {
        self.inner.write().ingest(record)
    }

    pub fn ingest_with_bit(&self, record: EventRecord, bit: bool) -> Result<Snapshot> {
        self.inner.write().ingest_with_bit(record, bit)
    }

    /// Idempotent
    pub fn close(&self) {
        self.inner.write().close();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.read().is_closed()
    }

    pub fn clock(&self) -> u64 {
        self.inner.read().clock()
    }

    pub fn query_membership(&self, signature: &str) -> bool {
        self.inner.read().query_membership(signature)
    }

    /// Copy of the current sample
    pub fn query_sample(&self) -> BTreeMap<u64, Vec<EventRecord>> {
        self.inner.read().query_sample().clone()
    }

    pub fn query_route(&self, user_id: u64) -> Option<Route> {
        self.inner.read().query_route(user_id)
    }

    pub fn query_cardinality(&self, user_id: u64) -> (u64, u64) {
        self.inner.read().query_cardinality(user_id)
    }

    pub fn query_moment(&self) -> u64 {
        self.inner.read().query_moment()
    }

    pub fn query_window_count(&self) -> f64 {
        self.inner.read().query_window_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::WindowBit;
    use crate::error::EngineError;
    use std::thread;

    #[test]
    fn test_concurrent_ingest_is_serialized() {
        let config = EngineConfig::default().with_window(10_000, WindowBit::EveryArrival);
        let engine = SharedEngine::new(config).unwrap();

        let handles: Vec<_> = (0..4u64)
            .map(|worker| {
                let engine = engine.clone();
                thread::spawn(move || {
                    for i in 0..250u64 {
                        engine
                            .ingest(EventRecord::new("memo", 1, worker * 1000 + i + 1))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(engine.clock(), 1000);
        assert_eq!(engine.query_moment(), 1000);
        assert!(engine.inner.read().query_window_bounds().contains(1000.0));
        assert_eq!(engine.query_cardinality(1), (1, 1));
    }

    #[test]
    fn test_close_shared() {
        let engine = SharedEngine::new(EngineConfig::default()).unwrap();
        let other = engine.clone();
        other.close();
        assert!(engine.is_closed());
        assert_eq!(
            engine.ingest(EventRecord::new("memo", 1, 1)).unwrap_err(),
            EngineError::InvalidState
        );
    }
}
