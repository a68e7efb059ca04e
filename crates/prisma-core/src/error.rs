//! Error types for the Prisma terminal engine.

use thiserror::Error;

/// Main error type for Prisma operations.
///
/// The input decoder never produces one of these: unrecognized remote input
/// results in "no event" instead. Errors are reserved for callers handing the
/// engine strings that are supposed to be known-good already.
#[derive(Debug, Error)]
pub enum Error {
    /// String is not exactly one well-formed escape sequence
    #[error("Malformed escape sequence {sequence:?}: {reason}")]
    MalformedSequence {
        /// The rejected candidate
        sequence: String,
        /// Why it was rejected
        reason: String,
    },

    /// Valid escape sequence that is not a Select Graphic Rendition
    #[error("Not an SGR sequence: {0:?}")]
    InvalidSgr(String),

    /// A terminal probe is already waiting for its answer
    #[error("Terminal probe already in progress")]
    ProbeInProgress,

    /// Terminal did not answer a probe in time
    #[error("Terminal probe timed out after {0}ms")]
    ProbeTimeout(u64),

    /// Probe was abandoned before the terminal answered
    #[error("Terminal probe cancelled")]
    ProbeCancelled,

    /// Charset not in the connection's supported list
    #[error("Unsupported charset: {0}")]
    UnsupportedCharset(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input or parameters (generic)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for a [`Error::MalformedSequence`].
    pub fn malformed(sequence: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedSequence {
            sequence: sequence.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
