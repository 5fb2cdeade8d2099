//! Collector errors

use codec::CodecError;
use network::TransportError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("Output error on {path:?}: {message}")]
    Output {
        message: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Fit file is not a valid frame stream: {0}")]
    Codec(#[from] CodecError),

    #[error("Failed to render message as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CollectorError {
    pub fn output(message: impl Into<String>, path: &Path, source: io::Error) -> Self {
        Self::Output {
            message: message.into(),
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type CollectorResult<T> = std::result::Result<T, CollectorError>;
