//! Custom error types for pat-host
//!
//! Only framing and I/O failures are fatal to the read loop; credential store
//! failures are converted into wire-level error responses by the router.

use thiserror::Error;

/// Main error type for the pat-host process
#[derive(Error, Debug)]
pub enum HostError {
    /// The peer closed the stream mid-frame
    #[error("truncated frame: expected {expected} bytes, read {actual}")]
    TruncatedFrame { expected: usize, actual: usize },

    /// The declared frame length fails the sanity cap
    #[error("frame length {0} exceeds the 1 MiB frame limit")]
    OversizedFrame(usize),

    /// Frame body is not valid UTF-8 JSON, or a response failed to encode
    #[error("malformed frame: {0}")]
    MalformedFrame(#[from] serde_json::Error),

    /// Credential store operation failed (keychain locked, backend missing)
    #[error("credential store error: {0}")]
    Credential(String),

    /// IO error on the stdin/stdout streams
    #[error("stream error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<keyring::Error> for HostError {
    fn from(err: keyring::Error) -> Self {
        HostError::Credential(err.to_string())
    }
}

/// Result type alias using HostError
pub type Result<T> = std::result::Result<T, HostError>;
