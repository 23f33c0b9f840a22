//! Unified error types for the deception endpoint.
//!
//! Nothing in the capture path surfaces these to a remote client; they are
//! logged and the request still resolves to one of the fixed decoy responses.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Sink error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkErrorCode {
    /// SINK_001: Failed to open the event store
    OpenFailed,
    /// SINK_002: Failed to append an event
    AppendFailed,
}

impl SinkErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::OpenFailed => "SINK_001",
            Self::AppendFailed => "SINK_002",
        }
    }
}

/// Unified error type for the deception endpoint.
#[derive(Debug, Error)]
pub enum Error {
    /// Event store error with code.
    #[error("[{code}] {message}")]
    Sink { code: &'static str, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an event store error.
    pub fn sink(code: SinkErrorCode, msg: impl Into<String>) -> Self {
        Self::Sink {
            code: code.code(),
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the error code if this is a coded error.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Sink { code, .. } => Some(code),
            _ => None,
        }
    }
}
