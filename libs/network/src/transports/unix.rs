//! Unix Domain Socket Transport
//!
//! Local IPC between a computation run's writers and the process collecting
//! its output.
//!
//! - [`UnixSocketTransport`] is the writer side: it actively connects and
//!   performs one blocking `write_all` per frame. No buffering beyond the
//!   frame itself, no timeout, no reconnection.
//! - [`UnixFrameListener`] is the collector side: it binds the socket path
//!   and yields one [`FrameConnection`] per connected writer.

use super::FrameSink;
use crate::{Result, TransportError};
use bytes::{Bytes, BytesMut};
use codec::{read_varint32, CodecError, DEFAULT_MAX_FRAME_SIZE, MAX_VARINT32_LEN};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tokio::net::UnixListener;
use tracing::{debug, info, trace};
use types::WriterMessage;

/// Unix socket configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnixSocketConfig {
    /// Socket path
    pub path: PathBuf,
    /// Maximum frame body size accepted by the listener
    pub max_frame_size: usize,
    /// Remove the socket file when the listener is dropped
    pub cleanup_on_drop: bool,
}

impl Default for UnixSocketConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/tmp/drawstream/fit.sock"),
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            cleanup_on_drop: true,
        }
    }
}

impl UnixSocketConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

/// Writer-side connection to a collector socket
#[derive(Debug)]
pub struct UnixSocketTransport {
    path: PathBuf,
    stream: Option<UnixStream>,
    frames_sent: u64,
    bytes_sent: u64,
}

impl UnixSocketTransport {
    /// Connect to a listening Unix socket
    pub fn connect<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let stream = UnixStream::connect(&path).map_err(|e| {
            TransportError::connection_with_source(
                "Failed to connect to Unix socket",
                Some(path.clone()),
                e,
            )
        })?;

        debug!("Connected to Unix socket: {:?}", path);

        Ok(Self {
            path,
            stream: Some(stream),
            frames_sent: 0,
            bytes_sent: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }
}

impl FrameSink for UnixSocketTransport {
    fn send(&mut self, frame: &[u8]) -> Result<usize> {
        let stream = self.stream.as_mut().ok_or(TransportError::Closed)?;

        stream
            .write_all(frame)
            .map_err(|e| TransportError::io("Failed to write frame", e))?;

        self.frames_sent += 1;
        self.bytes_sent += frame.len() as u64;
        trace!("Sent {} byte frame via Unix socket", frame.len());
        Ok(frame.len())
    }

    fn close(&mut self) -> Result<()> {
        let Some(stream) = self.stream.take() else {
            return Ok(());
        };

        match stream.shutdown(Shutdown::Both) {
            // peer already hung up; the socket is closed either way
            Err(e) if e.kind() != io::ErrorKind::NotConnected => {
                Err(TransportError::io("Failed to shutdown stream", e))
            }
            _ => {
                debug!(
                    frames = self.frames_sent,
                    bytes = self.bytes_sent,
                    "Unix socket connection closed: {:?}",
                    self.path
                );
                Ok(())
            }
        }
    }
}

impl Drop for UnixSocketTransport {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Collector-side listener accepting writer connections
#[derive(Debug)]
pub struct UnixFrameListener {
    config: UnixSocketConfig,
    listener: UnixListener,
}

impl UnixFrameListener {
    /// Bind to the configured path, replacing a stale socket file
    pub async fn bind(config: UnixSocketConfig) -> Result<Self> {
        let path = config.path.clone();

        if path.exists() {
            std::fs::remove_file(&path).map_err(|e| {
                TransportError::connection_with_source(
                    "Failed to remove existing socket",
                    Some(path.clone()),
                    e,
                )
            })?;
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                TransportError::connection_with_source(
                    "Failed to create socket directory",
                    Some(path.clone()),
                    e,
                )
            })?;
        }

        let listener = UnixListener::bind(&path).map_err(|e| {
            TransportError::connection_with_source("Failed to bind Unix socket", Some(path.clone()), e)
        })?;

        info!("Unix socket listening on: {:?}", path);
        Ok(Self { config, listener })
    }

    /// Accept the next writer connection
    pub async fn accept(&self) -> Result<FrameConnection> {
        let (stream, _) = self.listener.accept().await.map_err(|e| {
            TransportError::connection_with_source(
                "Failed to accept connection",
                Some(self.config.path.clone()),
                e,
            )
        })?;

        debug!("Accepted Unix socket connection");
        Ok(FrameConnection::new(stream, self.config.max_frame_size))
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }
}

impl Drop for UnixFrameListener {
    fn drop(&mut self) {
        if self.config.cleanup_on_drop && self.config.path.exists() {
            let _ = std::fs::remove_file(&self.config.path);
        }
    }
}

/// One accepted writer connection
#[derive(Debug)]
pub struct FrameConnection {
    stream: tokio::net::UnixStream,
    max_frame_size: usize,
    frames_received: u64,
    bytes_received: u64,
}

impl FrameConnection {
    pub fn new(stream: tokio::net::UnixStream, max_frame_size: usize) -> Self {
        Self {
            stream,
            max_frame_size,
            frames_received: 0,
            bytes_received: 0,
        }
    }

    /// Receive one frame body
    ///
    /// Returns `Ok(None)` when the writer closed the connection on a frame
    /// boundary. A connection closed mid-frame is a protocol error.
    pub async fn receive_frame(&mut self) -> Result<Option<Bytes>> {
        let mut prefix = [0u8; MAX_VARINT32_LEN];
        let mut filled = 0;

        let len = loop {
            let byte = match self.stream.read_u8().await {
                Ok(byte) => byte,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof && filled == 0 => {
                    debug!(frames = self.frames_received, "Writer disconnected");
                    return Ok(None);
                }
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    return Err(TransportError::protocol(format!(
                        "connection closed inside length prefix after {} bytes",
                        filled
                    )));
                }
                Err(e) => return Err(TransportError::io("Failed to read length prefix", e)),
            };

            prefix[filled] = byte;
            filled += 1;
            if let Some((len, _)) = read_varint32(&prefix[..filled])? {
                break len as usize;
            }
        };

        if len > self.max_frame_size {
            return Err(CodecError::FrameTooLarge {
                size: len,
                max: self.max_frame_size,
            }
            .into());
        }

        let mut body = BytesMut::zeroed(len);
        self.stream.read_exact(&mut body).await.map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                TransportError::protocol(format!("connection closed inside {} byte frame body", len))
            } else {
                TransportError::io("Failed to read frame body", e)
            }
        })?;

        self.frames_received += 1;
        self.bytes_received += (filled + len) as u64;
        trace!("Received {} byte frame via Unix socket", len);
        Ok(Some(body.freeze()))
    }

    /// Receive and decode one message
    pub async fn receive_message(&mut self) -> Result<Option<WriterMessage>> {
        match self.receive_frame().await? {
            Some(body) => Ok(Some(codec::decode_body(&body)?)),
            None => Ok(None),
        }
    }

    pub fn frames_received(&self) -> u64 {
        self.frames_received
    }

    pub fn bytes_received(&self) -> u64 {
        self.bytes_received
    }
}
