//! Error types for engine construction.

use crate::types::LineId;
use thiserror::Error;

/// Errors raised while validating configuration.
///
/// Frame processing itself never fails; every variant here is a
/// construction-time rejection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CountingError {
    #[error("invalid geometry for line {line_id}: {reason}")]
    InvalidLine { line_id: LineId, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for counter_core operations
pub type Result<T> = std::result::Result<T, CountingError>;
