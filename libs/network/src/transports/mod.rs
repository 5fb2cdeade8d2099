//! Frame Transport Layer
//!
//! Writers hand finished frames to a [`FrameSink`]. The production sink is
//! the blocking [`UnixSocketTransport`]; the receiving side of the same
//! socket is the async [`UnixFrameListener`].

use crate::Result;

pub mod unix;


pub use unix::{FrameConnection, UnixFrameListener, UnixSocketConfig, UnixSocketTransport};

/// Destination for complete frames
///
/// `send` must write the whole frame or fail; partial frames are never left
/// on the wire by a successful call. Implementations are used by exactly one
/// writer and need no internal synchronization.
pub trait FrameSink: Send {
    /// Write one complete frame, blocking until it is accepted
    fn send(&mut self, frame: &[u8]) -> Result<usize>;

    /// Release the underlying connection; calling it twice is a no-op
    fn close(&mut self) -> Result<()>;
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn send(&mut self, frame: &[u8]) -> Result<usize> {
        (**self).send(frame)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}
