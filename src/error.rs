// In: src/error.rs

//! This module defines the single, unified error type for the PAX delta codec.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Callers that need to react differently to misuse and to missing features
//! should match on [`PaxError::kind`] rather than on individual variants.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaxError {
    // =========================================================================
    // === Codec Contract Errors
    // =========================================================================
    /// The calling layer broke the codec contract (double append, wrong
    /// encoding kind, missing destination buffer). Not retryable.
    #[error("Codec contract violated: {0}")]
    Abort(String),

    /// The requested behavior exists in the codec family but not in this codec.
    #[error("Not implemented: {0}")]
    Unimplemented(String),

    /// The encoded input is truncated or internally inconsistent.
    #[error("Malformed delta stream: {0}")]
    MalformedStream(String),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === Buffer & Casting Errors
    // =========================================================================
    #[error("Buffer length mismatch: expected a multiple of {0}, got {1}")]
    BufferMismatch(usize, usize),

    /// An error from a safe byte-casting operation failing.
    #[error("Byte slice casting error: {0}")]
    PodCast(String), // Manual `From` impl is needed as bytemuck::PodCastError doesn't impl Error

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the underlying I/O subsystem (e.g. opening a log file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically while loading options.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

/// Coarse classification of a [`PaxError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Abort,
    Unimplemented,
    Malformed,
    Internal,
}

impl PaxError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PaxError::Abort(_) | PaxError::BufferMismatch(..) => ErrorKind::Abort,
            PaxError::Unimplemented(_) => ErrorKind::Unimplemented,
            PaxError::MalformedStream(_) | PaxError::SerdeJson(_) => ErrorKind::Malformed,
            PaxError::InternalError(_) | PaxError::PodCast(_) | PaxError::Io(_) => {
                ErrorKind::Internal
            }
        }
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        PaxError::MalformedStream(msg.into())
    }
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

impl From<bytemuck::PodCastError> for PaxError {
    fn from(err: bytemuck::PodCastError) -> Self {
        PaxError::PodCast(err.to_string())
    }
}
