//! Per-ingest view of every summary

use crate::error::InputError;
use crate::membership::MembershipResult;
use crate::sampling::Decision;

/// Query results of all five summaries right after one ingest
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// Logical time assigned to the event
    pub timestamp: u64,
    /// Membership signature derived from the event
    pub signature: String,
    pub membership: MembershipResult,
    /// `None` when the event had no usable user id
    pub sample: Option<Decision>,
    /// Users currently sampled
    pub sample_size: usize,
    /// Sample acceptance threshold after the event
    pub sample_threshold: u64,
    /// `(distinct, total)` for the event's user, `None` without a user id
    pub cardinality: Option<(u64, u64)>,
    /// First moment after the event
    pub moment: u64,
    /// Estimated 1-bits in the sliding window
    pub window_count: f64,
    /// Fields that were rejected by one or more summaries
    pub input_errors: Vec<InputError>,
}

impl Snapshot {
    /// Every summary accepted the event as-is
    pub fn is_clean(&self) -> bool {
        self.input_errors.is_empty()
    }
}
