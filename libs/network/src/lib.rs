//! Network Infrastructure
//!
//! Transports for Drawstream frames over local Unix domain sockets:
//! the blocking writer side used inside a computation run, and the async
//! listener used by whatever collects the run's output.

pub mod error;
pub mod test_utils;
pub mod transports;

// Re-export commonly used types
pub use error::{Result, TransportError};
pub use transports::{
    FrameConnection, FrameSink, UnixFrameListener, UnixSocketConfig, UnixSocketTransport,
};
