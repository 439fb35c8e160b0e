//! Error types for the deletable Bloom filter

use thiserror::Error;

/// Errors that can occur while constructing or operating a filter.
///
/// Duplicate inserts and removals of absent keys are normal outcomes and
/// are reported through [`InsertOutcome`](crate::InsertOutcome) and
/// [`RemoveOutcome`](crate::RemoveOutcome) instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Invalid filter handle")]
    InvalidHandle,

    #[error("Invalid filter parameters: {0}")]
    InvalidParameters(String),

    #[error("Failed to allocate {bytes} bytes for filter storage")]
    AllocationFailed { bytes: usize },

    #[error("Bit index out of range: {index} >= {len}")]
    BitOutOfRange { index: usize, len: usize },
}

impl FilterError {
    /// Whether the error was raised before any filter state existed.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            FilterError::InvalidParameters(_) | FilterError::AllocationFailed { .. }
        )
    }
}
