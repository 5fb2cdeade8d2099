//! In-memory frame sink for exercising writers without a socket

use crate::{FrameSink, Result, TransportError};
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

/// Shared log of frames a [`RecordingSink`] accepted
pub type FrameLog = Arc<Mutex<Vec<Vec<u8>>>>;

/// Records every frame instead of writing it anywhere
///
/// Clones of the [`FrameLog`] stay readable after the sink has been moved
/// into a writer. Failures can be queued to exercise error propagation.
#[derive(Debug, Default)]
pub struct RecordingSink {
    frames: FrameLog,
    pending_failures: VecDeque<io::ErrorKind>,
    closed: bool,
    close_calls: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the recorded frames
    pub fn frame_log(&self) -> FrameLog {
        Arc::clone(&self.frames)
    }

    /// Make the next `send` fail with `kind`
    pub fn fail_next_send(&mut self, kind: io::ErrorKind) {
        self.pending_failures.push_back(kind);
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls
    }
}

impl FrameSink for RecordingSink {
    fn send(&mut self, frame: &[u8]) -> Result<usize> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        if let Some(kind) = self.pending_failures.pop_front() {
            return Err(TransportError::io(
                "Failed to write frame",
                io::Error::new(kind, "injected failure"),
            ));
        }

        self.frames
            .lock()
            .map_err(|_| TransportError::protocol("frame log poisoned"))?
            .push(frame.to_vec());
        Ok(frame.len())
    }

    fn close(&mut self) -> Result<()> {
        self.close_calls += 1;
        self.closed = true;
        Ok(())
    }
}
