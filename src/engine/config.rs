//! Engine configuration
//!
//! Fixed at construction and never mutated afterwards.

use crate::error::ConfigError;

/// How the sliding-window bit is derived from an event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WindowBit {
    /// Every arrival is a 1-bit, so the window counts recent arrivals
    EveryArrival,
    /// 1 when the search frequency is at least the given value
    FrequencyAtLeast(i64),
}

impl WindowBit {
    /// Bit for an event with the given search frequency
    pub fn bit_for(self, search_frequency: i64) -> bool {
        match self {
            WindowBit::EveryArrival => true,
            WindowBit::FrequencyAtLeast(min) => search_frequency >= min,
        }
    }
}

/// Parameters of every summary held by the engine
///
/// The defaults are deliberately small so that collisions, threshold decay
/// and bucket merges show up within a few dozen events.
///
/// # Example
///
/// ```
/// use streamsum::engine::{EngineConfig, WindowBit};
///
/// let config = EngineConfig::default()
///     .with_filter(4096, 4)
///     .with_window(128, WindowBit::FrequencyAtLeast(50));
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Membership filter size in bits (m)
    pub filter_bits: usize,
    /// Number of membership hash functions (k)
    pub filter_hashes: usize,
    /// Ticks a signature stays recent in the membership filter
    pub recency_window: u64,
    /// Sample hash bucket count (b)
    pub sample_buckets: u64,
    /// Maximum number of sampled users
    pub sample_limit: usize,
    /// Sample hash multiplier (a)
    pub sample_multiplier: u64,
    /// Sample hash offset (c)
    pub sample_offset: u64,
    /// Sliding window length in arrivals (W)
    pub window_size: u64,
    /// Source of the sliding-window bit
    pub window_bit: WindowBit,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            filter_bits: 20,
            filter_hashes: 3,
            recency_window: 5,
            sample_buckets: 10,
            sample_limit: 3,
            sample_multiplier: 3,
            sample_offset: 7,
            window_size: 32,
            window_bit: WindowBit::EveryArrival,
        }
    }
}

impl EngineConfig {
    /// Membership filter size and hash count
    pub fn with_filter(mut self, bits: usize, hashes: usize) -> Self {
        self.filter_bits = bits;
        self.filter_hashes = hashes;
        self
    }

    pub fn with_recency_window(mut self, ticks: u64) -> Self {
        self.recency_window = ticks;
        self
    }

    /// Sample bucket count and user limit
    pub fn with_sample(mut self, buckets: u64, limit: usize) -> Self {
        self.sample_buckets = buckets;
        self.sample_limit = limit;
        self
    }

    /// Constants of the sample hash `(a * user + c) mod b`
    pub fn with_sample_hash(mut self, multiplier: u64, offset: u64) -> Self {
        self.sample_multiplier = multiplier;
        self.sample_offset = offset;
        self
    }

    pub fn with_window(mut self, size: u64, bit: WindowBit) -> Self {
        self.window_size = size;
        self.window_bit = bit;
        self
    }

    /// Check every parameter, reporting the first one out of range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.filter_bits == 0 {
            return Err(ConfigError::ZeroFilterBits);
        }
        if !(2..=32).contains(&self.filter_hashes) {
            return Err(ConfigError::HashCount(self.filter_hashes));
        }
        if self.sample_buckets == 0 {
            return Err(ConfigError::ZeroBuckets);
        }
        if self.sample_limit == 0 {
            return Err(ConfigError::ZeroSampleLimit);
        }
        if self.sample_multiplier % self.sample_buckets == 0 {
            return Err(ConfigError::DegenerateMultiplier {
                multiplier: self.sample_multiplier,
                buckets: self.sample_buckets,
            });
        }
        if self.window_size == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(())
    }
}
