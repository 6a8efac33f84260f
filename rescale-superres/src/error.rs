//! Error types for spatial resampling.

use thiserror::Error;

/// Result type for resampling operations.
pub type Result<T> = std::result::Result<T, SuperresError>;

/// Errors that can occur during spatial resampling.
#[derive(Debug, Error)]
pub enum SuperresError {
    /// Buffer management error from the core crate (allocation, bounds).
    #[error(transparent)]
    Core(#[from] rescale_core::Error),

    /// Scale denominator outside the supported `8..=16` range.
    #[error("Invalid scale denominator: {denom} (must be in 8..=16)")]
    InvalidDenominator { denom: u8 },

    /// Source and destination pictures disagree on a fixed property.
    #[error("Picture mismatch: {0}")]
    PictureMismatch(String),
}

impl SuperresError {
    /// Shorthand for a picture-mismatch error.
    pub fn mismatch(message: impl Into<String>) -> Self {
        Self::PictureMismatch(message.into())
    }
}
