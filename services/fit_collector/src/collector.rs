//! Fit collector
//!
//! Accepts writer connections on one Unix socket and appends every received
//! frame to a single fit file. Each connection runs in its own task; frames
//! are written whole under a lock, so frames from concurrent writers never
//! interleave inside the file.

use crate::error::{CollectorError, CollectorResult};
use crate::stats::TopicCounts;
use bytes::{Bytes, BytesMut};
use network::{FrameConnection, UnixFrameListener, UnixSocketConfig};
use serde::Serialize;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// How long open connections may keep running after shutdown is requested
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of one collector run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectorSummary {
    pub connections: u64,
    pub frames: TopicCounts,
    /// Connections still open when the drain timeout expired
    pub aborted: u64,
}

type SharedOutput = Arc<Mutex<File>>;

pub struct FitCollector {
    listener: UnixFrameListener,
    output: SharedOutput,
    output_path: PathBuf,
    drain_timeout: Duration,
}

impl FitCollector {
    /// Open the output file for appending and bind the socket
    pub async fn bind(socket: UnixSocketConfig, output: impl Into<PathBuf>) -> CollectorResult<Self> {
        let output_path = output.into();

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CollectorError::output("Failed to create output directory", &output_path, e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&output_path)
            .await
            .map_err(|e| CollectorError::output("Failed to open output file", &output_path, e))?;

        let listener = UnixFrameListener::bind(socket).await?;
        info!("Collecting frames into {:?}", output_path);

        Ok(Self {
            listener,
            output: Arc::new(Mutex::new(file)),
            output_path,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
        })
    }

    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    pub fn socket_path(&self) -> &Path {
        self.listener.path()
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Accept connections until `shutdown` resolves
    ///
    /// Pending connections are accepted before shutdown is observed. Open
    /// connections then get the drain timeout to finish before they are
    /// aborted, and the output file is flushed.
    pub async fn run_until<F>(self, shutdown: F) -> CollectorResult<CollectorSummary>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut tasks: JoinSet<TopicCounts> = JoinSet::new();
        let mut summary = CollectorSummary::default();

        loop {
            tokio::select! {
                biased;

                accepted = self.listener.accept() => match accepted {
                    Ok(conn) => {
                        summary.connections += 1;
                        let id = summary.connections;
                        tasks.spawn(handle_connection(id, conn, self.output.clone()));
                    }
                    Err(e) => warn!(error = %e, "Failed to accept writer connection"),
                },

                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    merge_joined(&mut summary, joined);
                }

                _ = &mut shutdown => {
                    info!(open = tasks.len(), "Shutdown requested");
                    break;
                }
            }
        }

        let drained = tokio::time::timeout(self.drain_timeout, async {
            while let Some(joined) = tasks.join_next().await {
                merge_joined(&mut summary, joined);
            }
        })
        .await;

        if drained.is_err() {
            summary.aborted = tasks.len() as u64;
            warn!(open = summary.aborted, "Drain timeout expired, aborting connections");
            tasks.shutdown().await;
        }

        self.output
            .lock()
            .await
            .flush()
            .await
            .map_err(|e| CollectorError::output("Failed to flush output file", &self.output_path, e))?;

        info!(
            connections = summary.connections,
            "Collector stopped: {}", summary.frames
        );
        Ok(summary)
    }
}

fn merge_joined(summary: &mut CollectorSummary, joined: Result<TopicCounts, tokio::task::JoinError>) {
    match joined {
        Ok(counts) => summary.frames.merge(&counts),
        Err(e) => error!(error = %e, "Connection task failed"),
    }
}

async fn handle_connection(id: u64, mut conn: FrameConnection, output: SharedOutput) -> TopicCounts {
    let mut counts = TopicCounts::default();
    debug!(connection = id, "Writer connected");

    loop {
        let body = match conn.receive_frame().await {
            Ok(Some(body)) => body,
            Ok(None) => break,
            Err(e) => {
                warn!(connection = id, error = %e, "Dropping writer connection");
                break;
            }
        };

        match codec::decode_body(&body) {
            Ok(message) => counts.record(message.topic),
            Err(e) => {
                warn!(connection = id, error = %e, "Dropping writer connection on undecodable frame");
                break;
            }
        }

        if let Err(e) = append_frame(&output, &body).await {
            error!(connection = id, error = %e, "Failed to store frame");
            break;
        }
    }

    info!(
        connection = id,
        bytes = conn.bytes_received(),
        "Writer connection closed: {}", counts
    );
    counts
}

async fn append_frame(output: &SharedOutput, body: &Bytes) -> std::io::Result<()> {
    // body length came off the wire as a varint32
    let len = body.len() as u32;
    let mut frame = BytesMut::with_capacity(codec::varint32_len(len) + body.len());
    codec::write_varint32(len, &mut frame);
    frame.extend_from_slice(body);

    output.lock().await.write_all(&frame).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;
    use tokio::sync::oneshot;
    use types::{Feature, Topic, WriterMessage};

    #[tokio::test]
    async fn test_frames_appended_to_existing_file() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out").join("run.fit");
        let socket = UnixSocketConfig::new(dir.path().join("fit.sock"));
        let path = socket.path.clone();

        let first = WriterMessage::new(Topic::Initialization, vec![Feature::unnamed_doubles(vec![1.0])]);
        std::fs::create_dir_all(output.parent().unwrap()).unwrap();
        std::fs::write(&output, codec::encode_frame(&first).unwrap()).unwrap();

        let collector = FitCollector::bind(socket, &output).await.unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        let run = tokio::spawn(collector.run_until(async {
            let _ = stopped.await;
        }));

        let second = WriterMessage::new(Topic::Sample, vec![Feature::doubles("lp__", vec![-2.5])]);
        let frame = codec::encode_frame(&second).unwrap();
        tokio::task::spawn_blocking(move || {
            let mut stream = std::os::unix::net::UnixStream::connect(&path).unwrap();
            stream.write_all(&frame).unwrap();
        })
        .await
        .unwrap();

        stop.send(()).unwrap();
        let summary = run.await.unwrap().unwrap();
        assert_eq!(summary.connections, 1);
        assert_eq!(summary.frames.sample, 1);
        assert_eq!(summary.aborted, 0);

        let stored = codec::decode_frames(&std::fs::read(&output).unwrap()).unwrap();
        assert_eq!(stored, vec![first, second]);
    }

    #[tokio::test]
    async fn test_bad_frame_drops_only_that_connection() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("run.fit");
        let socket = UnixSocketConfig::new(dir.path().join("fit.sock"));
        let path = socket.path.clone();

        let collector = FitCollector::bind(socket, &output).await.unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        let run = tokio::spawn(collector.run_until(async {
            let _ = stopped.await;
        }));

        let good = WriterMessage::new(Topic::Diagnostic, vec![Feature::unnamed_bytes(vec![b"ok".to_vec()])]);
        let good_frame = codec::encode_frame(&good).unwrap();
        tokio::task::spawn_blocking(move || {
            // field 1 with wire type 7 is not valid protobuf
            let mut bad = std::os::unix::net::UnixStream::connect(&path).unwrap();
            bad.write_all(&[0x01, 0x0F]).unwrap();
            drop(bad);

            let mut good = std::os::unix::net::UnixStream::connect(&path).unwrap();
            good.write_all(&good_frame).unwrap();
        })
        .await
        .unwrap();

        stop.send(()).unwrap();
        let summary = run.await.unwrap().unwrap();
        assert_eq!(summary.connections, 2);
        assert_eq!(summary.frames.total(), 1);

        let stored = codec::decode_frames(&std::fs::read(&output).unwrap()).unwrap();
        assert_eq!(stored, vec![good]);
    }

    #[tokio::test]
    async fn test_open_connection_aborted_after_drain_timeout() {
        let dir = tempdir().unwrap();
        let socket = UnixSocketConfig::new(dir.path().join("fit.sock"));
        let path = socket.path.clone();

        let collector = FitCollector::bind(socket, dir.path().join("run.fit"))
            .await
            .unwrap()
            .with_drain_timeout(Duration::from_millis(50));

        let (stop, stopped) = oneshot::channel::<()>();
        let run = tokio::spawn(collector.run_until(async {
            let _ = stopped.await;
        }));

        // held open across shutdown
        let idle = tokio::task::spawn_blocking(move || std::os::unix::net::UnixStream::connect(&path).unwrap())
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        stop.send(()).unwrap();
        let summary = run.await.unwrap().unwrap();
        assert_eq!(summary.connections, 1);
        assert_eq!(summary.aborted, 1);
        drop(idle);
    }
}
