//! Exact per-user distinct and total counts
//!
//! Memory grows with the number of distinct (user, key) pairs and nothing is
//! ever evicted. This is the ground truth the approximate summaries are
//! checked against, not a sketch.

use std::collections::{BTreeSet, HashMap};

use crate::traits::{Mergeable, MergeError, Summary};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct UserCounts {
    distinct: BTreeSet<String>,
    total: u64,
}

/// Distinct-key and occurrence counts per user
///
/// # Example
///
/// ```
/// use streamsum::cardinality::ExactCardinalityTracker;
///
/// let mut tracker = ExactCardinalityTracker::new();
/// tracker.observe(5, "memo");
/// tracker.observe(5, "memo");
/// tracker.observe(5, "report");
///
/// assert_eq!(tracker.query(5), (2, 3));
/// assert_eq!(tracker.query(6), (0, 0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ExactCardinalityTracker {
    users: HashMap<u64, UserCounts>,
    count: u64,
}

impl ExactCardinalityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `key` for `user_id`
    pub fn observe(&mut self, user_id: u64, key: &str) {
        let counts = self.users.entry(user_id).or_default();
        if !counts.distinct.contains(key) {
            counts.distinct.insert(key.to_owned());
        }
        counts.total += 1;
        self.count += 1;
    }

    /// `(distinct_count, total_count)` for a user; `(0, 0)` if never seen
    pub fn query(&self, user_id: u64) -> (u64, u64) {
        self.users
            .get(&user_id)
            .map(|c| (c.distinct.len() as u64, c.total))
            .unwrap_or((0, 0))
    }

    /// Distinct keys seen for a user, in sorted order
    pub fn distinct_keys(&self, user_id: u64) -> impl Iterator<Item = &str> {
        self.users
            .get(&user_id)
            .into_iter()
            .flat_map(|c| c.distinct.iter().map(String::as_str))
    }

    /// Every tracked user with its `(distinct_count, total_count)`
    pub fn users(&self) -> impl Iterator<Item = (u64, (u64, u64))> + '_ {
        self.users
            .iter()
            .map(|(&user, c)| (user, (c.distinct.len() as u64, c.total)))
    }

    /// Number of tracked users
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Summary for ExactCardinalityTracker {
    fn clear(&mut self) {
        self.users.clear();
        self.count = 0;
    }

    fn size_bytes(&self) -> usize {
        let keys: usize = self
            .users
            .values()
            .flat_map(|c| c.distinct.iter())
            .map(|k| k.capacity() + 24)
            .sum();
        keys + self.users.len() * core::mem::size_of::<(u64, UserCounts)>() + 32
    }

    fn count(&self) -> u64 {
        self.count
    }
}

impl Mergeable for ExactCardinalityTracker {
    fn merge(&mut self, other: &Self) -> Result<(), MergeError> {
        for (&user, theirs) in &other.users {
            let ours = self.users.entry(user).or_default();
            ours.distinct.extend(theirs.distinct.iter().cloned());
            ours.total += theirs.total;
        }
        self.count += other.count;
        Ok(())
    }
}
