//! Error types for the rescale core.

use thiserror::Error;

/// Result type for core picture operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while managing picture buffers.
#[derive(Debug, Error)]
pub enum Error {
    /// A buffer or scratch allocation could not be satisfied.
    #[error("Resource exhausted: failed to allocate {requested} bytes for {what}")]
    ResourceExhausted {
        /// What the allocation was for.
        what: &'static str,
        /// Requested size in bytes.
        requested: usize,
    },

    /// Picture or plane dimensions are invalid.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// A caller-supplied buffer is smaller than the operation requires.
    #[error("Buffer too small: need {needed} samples, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// Unsupported configuration (bit depth, color format, ...).
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl Error {
    /// Shorthand for an unsupported-configuration error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }
}

/// Allocate a zero-initialized `Vec`, surfacing allocation failure as an
/// error instead of aborting.
pub fn try_alloc_vec<T: Clone + Default>(len: usize, what: &'static str) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|_| Error::ResourceExhausted {
        what,
        requested: len * std::mem::size_of::<T>(),
    })?;
    v.resize(len, T::default());
    Ok(v)
}
