//! Error taxonomy shared by the generator and every analyzer.

use thiserror::Error;

/// Errors surfaced by the generator and the analyzers.
///
/// Every failure is local and synchronous: a malformed input aborts the
/// analyzer that received it and leaves the generator untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatteryError {
    /// Bad construction arguments (non-positive modulus, seed outside `[0, N)`).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A length, lag, bin count or pattern size outside the accepted range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Degenerate zero-variance input to a normalizer.
    #[error("division by zero: {0}")]
    DivisionByZero(String),

    /// A value that does not fit the fixed bit width or the unit interval.
    #[error("value {value} out of range: {reason}")]
    RangeError { value: String, reason: String },
}

/// Result type for generator and analyzer operations.
pub type Result<T> = std::result::Result<T, BatteryError>;

impl BatteryError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn out_of_range(value: impl ToString, reason: impl Into<String>) -> Self {
        Self::RangeError {
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Short machine-readable kind, used in serialized battery reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidParameter(_) => "invalid_parameter",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::DivisionByZero(_) => "division_by_zero",
            Self::RangeError { .. } => "range_error",
        }
    }
}
