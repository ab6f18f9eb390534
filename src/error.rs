//! Error types for event ingestion and engine configuration.

use thiserror::Error;

/// Malformed event fields.
///
/// These never abort an ingest: the summaries that can still use the event
/// are updated and the error travels back inside the ingest snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputError {
    #[error("search frequency must be non-negative, got {0}")]
    NegativeFrequency(i64),

    #[error("event has no user id")]
    MissingUserId,

    #[error("user id must be at least 1, got {0}")]
    InvalidUserId(u64),
}

/// Rejected engine configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("membership filter needs at least one bit")]
    ZeroFilterBits,

    #[error("membership filter needs between 2 and 32 hash functions, got {0}")]
    HashCount(usize),

    #[error("sample bucket count must be positive")]
    ZeroBuckets,

    #[error("sample limit must be positive")]
    ZeroSampleLimit,

    #[error("sample hash multiplier {multiplier} collapses every user into one bucket modulo {buckets}")]
    DegenerateMultiplier { multiplier: u64, buckets: u64 },

    #[error("window size must be positive")]
    ZeroWindow,
}

/// Hard failures surfaced by the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// `ingest` was called after `close`
    #[error("engine is closed")]
    InvalidState,

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            InputError::NegativeFrequency(-3).to_string(),
            "search frequency must be non-negative, got -3"
        );
        assert_eq!(EngineError::InvalidState.to_string(), "engine is closed");

        let err: EngineError = ConfigError::HashCount(1).into();
        assert_eq!(
            err.to_string(),
            "invalid configuration: membership filter needs between 2 and 32 hash functions, got 1"
        );
    }
}
