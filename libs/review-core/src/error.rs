//! Error types for review-core.

use thiserror::Error;

/// Result type alias using ReviewError.
pub type Result<T> = std::result::Result<T, ReviewError>;

/// Errors raised while validating review input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("invalid rating {value:?}, expected one of again, hard, good, easy")]
    InvalidRating { value: String },
}
