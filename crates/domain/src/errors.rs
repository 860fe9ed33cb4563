//! Domain error types.

use thiserror::Error;

/// Errors raised while parsing report query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Invalid range '{0}'. Expected daily, yesterday, weekly, monthly or custom:YYYY-MM-DD:YYYY-MM-DD")]
    InvalidRange(String),

    #[error("Custom range start {start} is after end {end}")]
    InvertedRange { start: String, end: String },

    #[error("Custom range spans {days} days; at most {max} are allowed")]
    RangeTooLong { days: i64, max: i64 },

    #[error("Invalid shift '{0}'. Expected HH:MM:SS-HH:MM:SS or All")]
    InvalidShift(String),

    #[error("Unknown timezone '{0}'")]
    InvalidTimezone(String),

    #[error("Invalid user id '{0}'")]
    InvalidUser(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),
}
