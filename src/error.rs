//! Error handling for the huffpack library
//!
//! Every fallible operation returns [`Result`]. Empty input is not an error:
//! it is modelled as an absent blob (`None`) at the API surface. Broken
//! internal invariants (a zero-length code, a symbol reached twice while
//! flattening the tree) are panics, not values of this type.

use thiserror::Error;

/// Main error type for the huffpack library
#[derive(Error, Debug)]
pub enum HuffpackError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input to a constructor (frequency table, blob parts)
    #[error("Invalid data: {message}")]
    InvalidData {
        /// Error message describing the issue
        message: String,
    },

    /// The packed bitstream does not walk the code tree cleanly
    #[error("Corrupt bitstream: {message}")]
    CorruptStream {
        /// Error message describing where the walk failed
        message: String,
    },

    /// Symbol count or buffer size disagrees with the recorded length
    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Length recorded in the blob
        expected: usize,
        /// Length actually available or produced
        actual: usize,
    },

    /// Input exceeds the configured encoder limit
    #[error("Input too large: {len} bytes exceeds limit of {limit}")]
    InputTooLarge {
        /// Input length in bytes
        len: usize,
        /// Configured limit in bytes
        limit: usize,
    },

    /// Configuration or parameter errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },
}

impl HuffpackError {
    /// Create an invalid data error
    pub fn invalid_data<S: Into<String>>(message: S) -> Self {
        Self::InvalidData { message: message.into() }
    }

    /// Create a corrupt stream error
    pub fn corrupt_stream<S: Into<String>>(message: S) -> Self {
        Self::CorruptStream { message: message.into() }
    }

    /// Create a length mismatch error
    pub fn length_mismatch(expected: usize, actual: usize) -> Self {
        Self::LengthMismatch { expected, actual }
    }

    /// Create an input too large error
    pub fn input_too_large(len: usize, limit: usize) -> Self {
        Self::InputTooLarge { len, limit }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Check if this is a recoverable error
    ///
    /// Only I/O failures may succeed on retry; the codec itself is
    /// deterministic, so retrying a decode or encode gives the same answer.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::InvalidData { .. } => false,
            Self::CorruptStream { .. } => false,
            Self::LengthMismatch { .. } => false,
            Self::InputTooLarge { .. } => false,
            Self::Configuration { .. } => false,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::InvalidData { .. } => "data",
            Self::CorruptStream { .. } => "stream",
            Self::LengthMismatch { .. } => "length",
            Self::InputTooLarge { .. } => "limit",
            Self::Configuration { .. } => "config",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, HuffpackError>;
