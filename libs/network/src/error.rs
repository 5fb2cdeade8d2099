//! Transport Error Types
//!
//! Error handling for socket connect, frame send and frame receive failures.
//! Transport errors are surfaced to the caller unchanged; nothing in this
//! crate retries or reconnects.

use codec::CodecError;
use std::path::PathBuf;
use thiserror::Error;

/// Main transport error type
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection establishment or listener setup errors
    #[error("Connection error: {message} (path: {path:?})")]
    Connection {
        message: String,
        path: Option<PathBuf>,
        source: Option<std::io::Error>,
    },

    /// Generic I/O errors on an established connection
    #[error("I/O error: {message}")]
    Io {
        message: String,
        source: std::io::Error,
    },

    /// Frame exceeds the configured limit
    #[error("Frame too large: {size} bytes exceeds maximum {max}")]
    FrameTooLarge { size: usize, max: usize },

    /// Received bytes do not form a valid frame
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    /// Operation on a transport that was already closed
    #[error("Transport closed")]
    Closed,
}

/// Result type alias for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

impl TransportError {
    /// Create a connection error
    pub fn connection(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Connection {
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create a connection error with source
    pub fn connection_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Connection {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    /// Create an I/O error
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Kind of the underlying I/O error, if any
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::Io { source, .. } => Some(source.kind()),
            Self::Connection {
                source: Some(source),
                ..
            } => Some(source.kind()),
            _ => None,
        }
    }
}

impl From<CodecError> for TransportError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::FrameTooLarge { size, max } => Self::FrameTooLarge { size, max },
            other => Self::protocol(other.to_string()),
        }
    }
}
