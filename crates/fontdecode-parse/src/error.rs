//! Error types for the document backend layer.
//!
//! Uses [`thiserror`] for ergonomic error derivation. [`BackendError`] covers
//! failures while locating a font inside a document and converts into the
//! core [`DecodeError`]. Decoding operations themselves never return errors.

use fontdecode_core::DecodeError;
use thiserror::Error;

/// Error type for font lookup in a document backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error resolving document structure (wrong object types, broken references).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// The requested font could not be found.
    #[error("font error: {0}")]
    Font(String),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] DecodeError),
}

impl From<lopdf::Error> for BackendError {
    fn from(err: lopdf::Error) -> Self {
        BackendError::Parse(err.to_string())
    }
}

impl From<BackendError> for DecodeError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => DecodeError::InvalidObject(msg),
            BackendError::Font(msg) => DecodeError::FontNotFound(msg),
            BackendError::Core(e) => e,
        }
    }
}
