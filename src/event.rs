//! Event records flowing into the engine

use crate::error::InputError;

/// Width of one search-frequency bucket in a membership signature
pub const FREQUENCY_BUCKET_WIDTH: i64 = 10;

/// One document interaction
///
/// Fields are kept as received so malformed values (a negative frequency, a
/// missing user) can be reported instead of being unrepresentable.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EventRecord {
    document_type: String,
    search_frequency: i64,
    #[cfg_attr(feature = "serde", serde(default))]
    user_id: Option<u64>,
}

impl EventRecord {
    /// Create a record for a known user
    pub fn new(document_type: impl Into<String>, search_frequency: i64, user_id: u64) -> Self {
        Self {
            document_type: document_type.into(),
            search_frequency,
            user_id: Some(user_id),
        }
    }

    /// Create a record whose user could not be attributed
    pub fn anonymous(document_type: impl Into<String>, search_frequency: i64) -> Self {
        Self {
            document_type: document_type.into(),
            search_frequency,
            user_id: None,
        }
    }

    pub fn document_type(&self) -> &str {
        &self.document_type
    }

    pub fn search_frequency(&self) -> i64 {
        self.search_frequency
    }

    pub fn user_id(&self) -> Option<u64> {
        self.user_id
    }

    /// The user id, if present and at least 1
    pub fn validated_user(&self) -> Result<u64, InputError> {
        match self.user_id {
            None => Err(InputError::MissingUserId),
            Some(0) => Err(InputError::InvalidUserId(0)),
            Some(id) => Ok(id),
        }
    }

    /// Membership signature: lowercased type plus frequency bucket
    ///
    /// `"Memo"` with frequency 42 becomes `"memo_4"`. A negative frequency has
    /// no bucket and yields the lowercased type alone.
    pub fn signature(&self) -> String {
        let kind = self.document_type.to_lowercase();
        if self.search_frequency < 0 {
            kind
        } else {
            format!("{}_{}", kind, self.search_frequency / FREQUENCY_BUCKET_WIDTH)
        }
    }
}
