//! Capture listener

use anyhow::{Context, Result};
use network::{UnixFrameListener, UnixSocketConfig};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::debug;
use types::{Topic, WriterMessage};

/// Messages received on each accepted connection, in accept order
#[derive(Debug, Default)]
pub struct Capture {
    pub connections: Vec<Vec<WriterMessage>>,
}

impl Capture {
    /// All messages of one topic across connections
    pub fn topic(&self, topic: Topic) -> Vec<&WriterMessage> {
        self.connections
            .iter()
            .flatten()
            .filter(|m| m.topic == topic as i32)
            .collect()
    }

    pub fn total(&self) -> usize {
        self.connections.iter().map(Vec::len).sum()
    }
}

/// Frame listener that records a fixed number of writer connections
pub struct CaptureListener {
    _dir: TempDir,
    path: PathBuf,
    task: JoinHandle<Result<Capture>>,
}

impl CaptureListener {
    /// Bind a fresh socket and capture `expected` connections sequentially
    ///
    /// Each connection is read to its end before the next is accepted.
    pub async fn start(expected: usize) -> Result<Self> {
        let dir = tempfile::tempdir().context("Failed to create socket directory")?;
        let path = dir.path().join("fit.sock");
        let listener = UnixFrameListener::bind(UnixSocketConfig::new(&path)).await?;

        let task = tokio::spawn(async move {
            let mut capture = Capture::default();
            for index in 0..expected {
                let mut conn = listener.accept().await?;
                let mut messages = Vec::new();
                while let Some(message) = conn.receive_message().await? {
                    messages.push(message);
                }
                debug!(connection = index, messages = messages.len(), "capture complete");
                capture.connections.push(messages);
            }
            Ok(capture)
        });

        Ok(Self {
            _dir: dir,
            path,
            task,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait for every expected connection to close
    pub async fn finish(self) -> Result<Capture> {
        self.task.await.context("Capture task panicked")?
    }
}

static LOGGING: Once = Once::new();

/// Route test logs through the test harness writer; `RUST_LOG` sets the filter
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
