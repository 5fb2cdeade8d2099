//! Codec errors for frame encoding and decoding
//!
//! Encoding errors indicate a bug or an impossible message size and are
//! treated as fatal by callers. Decoding errors carry enough context to tell
//! a corrupted stream from a truncated one.

use thiserror::Error;

/// Frame encoding/decoding errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    /// Message could not be serialized into a frame
    #[error("Encoding failed: {reason} (body: {body_len} bytes)")]
    Encoding { body_len: usize, reason: String },

    /// Frame body is not a valid `WriterMessage`
    #[error("Decode failed: {reason} (body: {body_len} bytes)")]
    Decode { body_len: usize, reason: String },

    /// Declared body length exceeds the decoder limit
    #[error("Frame too large: {size} bytes exceeds maximum {max}")]
    FrameTooLarge { size: usize, max: usize },

    /// Length prefix is not a valid varint32
    #[error("Malformed length prefix: {reason} (after {bytes_read} bytes)")]
    MalformedLength { bytes_read: usize, reason: String },

    /// Stream ended inside a frame
    #[error("Truncated frame: {buffered} bytes left after the last complete frame")]
    TruncatedFrame { buffered: usize },
}

impl CodecError {
    pub fn encoding(body_len: usize, reason: impl Into<String>) -> Self {
        Self::Encoding {
            body_len,
            reason: reason.into(),
        }
    }

    pub fn decode(body_len: usize, reason: impl Into<String>) -> Self {
        Self::Decode {
            body_len,
            reason: reason.into(),
        }
    }

    pub fn malformed_length(bytes_read: usize, reason: impl Into<String>) -> Self {
        Self::MalformedLength {
            bytes_read,
            reason: reason.into(),
        }
    }
}

/// Result type for codec operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;
