//! Fan-out of one event stream into every summary

use std::collections::BTreeMap;

use crate::cardinality::ExactCardinalityTracker;
use crate::error::{EngineError, Result};
use crate::event::EventRecord;
use crate::membership::HashedMembershipFilter;
use crate::sampling::{AdaptiveSampleSet, Route};
use crate::statistics::MomentAccumulator;
use crate::traits::{CountEstimate, ErrorBounds};
use crate::window::SlidingWindowCounter;

use super::config::EngineConfig;
use super::snapshot::Snapshot;

/// Lifecycle of a dispatcher
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatcherState {
    /// Accepting events
    Ready,
    /// Terminal; queries still work, ingestion does not
    Closed,
}

/// Single-threaded engine feeding each event to all five summaries
///
/// Every ingest advances the logical clock exactly once and calls each
/// summary's `observe` exactly once. A malformed field only disables the
/// summaries that need it; the rest are still updated and the problem is
/// reported in the returned [`Snapshot`].
///
/// # Example
///
/// ```
/// use streamsum::engine::{EngineConfig, StreamDispatcher};
/// use streamsum::event::EventRecord;
///
/// let mut engine = StreamDispatcher::new(EngineConfig::default()).unwrap();
///
/// for _ in 0..3 {
///     engine.ingest(EventRecord::new("memo", 12, 5)).unwrap();
/// }
///
/// assert_eq!(engine.query_cardinality(5), (1, 3));
/// assert_eq!(engine.query_moment(), 36);
/// assert!(engine.query_membership("memo_1"));
///
/// engine.close();
/// assert!(engine.ingest(EventRecord::new("memo", 12, 5)).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct StreamDispatcher {
    config: EngineConfig,
    state: DispatcherState,
    clock: u64,
    membership: HashedMembershipFilter,
    sample: AdaptiveSampleSet<EventRecord>,
    cardinality: ExactCardinalityTracker,
    moments: MomentAccumulator,
    window: SlidingWindowCounter,
}

impl StreamDispatcher {
    /// Build every summary from a validated configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            membership: HashedMembershipFilter::new(
                config.filter_bits,
                config.filter_hashes,
                config.recency_window,
            ),
            sample: AdaptiveSampleSet::new(
                config.sample_buckets,
                config.sample_limit,
                config.sample_multiplier,
                config.sample_offset,
            ),
            cardinality: ExactCardinalityTracker::new(),
            moments: MomentAccumulator::new(),
            window: SlidingWindowCounter::new(config.window_size),
            state: DispatcherState::Ready,
            clock: 0,
            config,
        })
    }

    /// Ingest an event, deriving the window bit from the configured policy
    pub fn ingest(&mut self, record: EventRecord) -> Result<Snapshot> {
        let bit = self.config.window_bit.bit_for(record.search_frequency());
        self.ingest_with_bit(record, bit)
    }

    /// Ingest an event with a caller-supplied window bit
    pub fn ingest_with_bit(&mut self, record: EventRecord, bit: bool) -> Result<Snapshot> {
        if self.state == DispatcherState::Closed {
            tracing::warn!(target: "streamsum::engine", "ingest rejected: engine is closed");
            return Err(EngineError::InvalidState);
        }

        self.clock += 1;
        let timestamp = self.clock;
        let mut input_errors = Vec::new();

        let signature = record.signature();
        let membership = self.membership.observe(&signature, timestamp);

        if let Err(err) = self.moments.observe(record.search_frequency()) {
            input_errors.push(err);
        }

        self.window.observe(bit);

        let (sample, cardinality) = match record.validated_user() {
            Ok(user_id) => {
                self.cardinality.observe(user_id, record.document_type());
                let decision = self.sample.observe(user_id, record);
                (Some(decision), Some(self.cardinality.query(user_id)))
            }
            Err(err) => {
                input_errors.push(err);
                (None, None)
            }
        };

        if !input_errors.is_empty() {
            tracing::debug!(
                target: "streamsum::engine",
                timestamp,
                errors = input_errors.len(),
                "event partially rejected"
            );
        }

        tracing::trace!(
            target: "streamsum::engine",
            timestamp,
            signature = %signature,
            possibly_seen = membership.possibly_seen,
            "ingest"
        );

        Ok(Snapshot {
            timestamp,
            signature,
            membership,
            sample,
            sample_size: self.sample.len(),
            sample_threshold: self.sample.threshold(),
            cardinality,
            moment: self.moments.query(),
            window_count: self.window.estimate(),
            input_errors,
        })
    }

    /// Stop accepting events; idempotent
    pub fn close(&mut self) {
        if self.state == DispatcherState::Ready {
            self.state = DispatcherState::Closed;
            tracing::debug!(target: "streamsum::engine", clock = self.clock, "engine closed");
        }
    }

    pub fn state(&self) -> DispatcherState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == DispatcherState::Closed
    }

    /// Number of events ingested
    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether `signature` was possibly seen within the recency window
    pub fn query_membership(&self, signature: &str) -> bool {
        self.membership.query(signature, self.clock)
    }

    /// Estimated false positive rate of the membership bit array
    pub fn query_membership_false_positive_rate(&self) -> f64 {
        self.membership.estimated_false_positive_rate()
    }

    /// Sampled users and their events
    pub fn query_sample(&self) -> &BTreeMap<u64, Vec<EventRecord>> {
        self.sample.sample()
    }

    pub fn query_sample_threshold(&self) -> u64 {
        self.sample.threshold()
    }

    /// Route from the user's latest sampling decision
    pub fn query_route(&self, user_id: u64) -> Option<Route> {
        self.sample.route(user_id)
    }

    /// `(distinct document types, total events)` for a user
    pub fn query_cardinality(&self, user_id: u64) -> (u64, u64) {
        self.cardinality.query(user_id)
    }

    /// Sum of all valid search frequencies
    pub fn query_moment(&self) -> u64 {
        self.moments.query()
    }

    /// Estimated 1-bits among the last `window_size` events
    pub fn query_window_count(&self) -> f64 {
        self.window.estimate()
    }

    pub fn query_window_bounds(&self) -> ErrorBounds {
        self.window.estimate_with_bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;

    fn engine() -> StreamDispatcher {
        StreamDispatcher::new(EngineConfig::default().with_filter(1024, 3)).unwrap()
    }

    #[test]
    fn test_clock_advances_once_per_event() {
        let mut engine = engine();
        for i in 1..=4 {
            let snapshot = engine.ingest(EventRecord::new("memo", 5, 1)).unwrap();
            assert_eq!(snapshot.timestamp, i);
        }
        assert_eq!(engine.clock(), 4);
    }

    #[test]
    fn test_snapshot_contents() {
        let mut engine = engine();
        engine.ingest(EventRecord::new("Report", 42, 2)).unwrap();
        let snapshot = engine.ingest(EventRecord::new("report", 47, 2)).unwrap();

        assert_eq!(snapshot.signature, "report_4");
        assert!(snapshot.membership.possibly_seen);
        assert_eq!(snapshot.cardinality, Some((1, 2)));
        assert_eq!(snapshot.moment, 89);
        assert_eq!(snapshot.window_count, 2.0);
        assert!(snapshot.sample.is_some_and(|d| d.accepted));
        assert!(snapshot.is_clean());
    }

    #[test]
    fn test_negative_frequency_is_partial() {
        let mut engine = engine();
        let snapshot = engine.ingest(EventRecord::new("memo", -3, 4)).unwrap();

        assert_eq!(snapshot.input_errors, vec![InputError::NegativeFrequency(-3)]);
        assert_eq!(snapshot.moment, 0);
        // Everything else still saw the event
        assert_eq!(snapshot.cardinality, Some((1, 1)));
        assert_eq!(snapshot.signature, "memo");
        assert_eq!(engine.query_window_count(), 1.0);
        assert_eq!(engine.clock(), 1);
    }

    #[test]
    fn test_missing_user_is_partial() {
        let mut engine = engine();
        let snapshot = engine.ingest(EventRecord::anonymous("email", 30)).unwrap();

        assert_eq!(snapshot.input_errors, vec![InputError::MissingUserId]);
        assert_eq!(snapshot.sample, None);
        assert_eq!(snapshot.cardinality, None);
        assert_eq!(snapshot.moment, 30);
        assert!(engine.query_membership("email_3"));
        assert!(engine.query_sample().is_empty());
    }

    #[test]
    fn test_closed_rejects_ingest() {
        let mut engine = engine();
        engine.ingest(EventRecord::new("memo", 10, 1)).unwrap();
        engine.close();
        engine.close();

        assert_eq!(engine.state(), DispatcherState::Closed);
        assert_eq!(
            engine.ingest(EventRecord::new("memo", 10, 1)),
            Err(EngineError::InvalidState)
        );
        // State untouched, queries still answer
        assert_eq!(engine.clock(), 1);
        assert_eq!(engine.query_cardinality(1), (1, 1));
        assert_eq!(engine.query_moment(), 10);
    }

    #[test]
    fn test_window_bit_policy() {
        let config = EngineConfig::default()
            .with_window(10, crate::engine::WindowBit::FrequencyAtLeast(50));
        let mut engine = StreamDispatcher::new(config).unwrap();
        engine.ingest(EventRecord::new("memo", 10, 1)).unwrap();
        engine.ingest(EventRecord::new("memo", 60, 1)).unwrap();
        engine.ingest_with_bit(EventRecord::new("memo", 0, 1), true).unwrap();
        assert_eq!(engine.query_window_count(), 2.0);
    }

    #[test]
    fn test_routes() {
        let mut engine = engine();
        for user in 1..=15u64 {
            engine.ingest(EventRecord::new("memo", 1, user)).unwrap();
        }
        assert_eq!(engine.query_route(1), Some(Route::Priority));
        assert_eq!(engine.query_route(7), Some(Route::Normal));
        assert_eq!(engine.query_sample_threshold(), 1);
    }

    #[test]
    fn test_invalid_config() {
        let config = EngineConfig::default().with_filter(0, 3);
        assert!(matches!(
            StreamDispatcher::new(config),
            Err(EngineError::Config(_))
        ));
    }
}
