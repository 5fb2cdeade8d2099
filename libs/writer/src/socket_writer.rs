//! Socket writer: router + encoder + transport for one output channel

use crate::adaptation::AdaptationPhase;
use crate::error::{WriterError, WriterResult};
use crate::role::Role;
use crate::router::{Call, Router};
use network::{FrameSink, UnixSocketTransport};
use std::path::Path;
use tracing::{debug, trace};

/// The call surface the upstream computation drives
///
/// One implementation receives the whole ordered call sequence of one
/// output channel for one computation run.
pub trait Callbacks {
    type Error;

    /// A list of names: a column header, or string data on diagnostic writers
    fn names<N: AsRef<str>>(&mut self, names: &[N]) -> Result<(), Self::Error>;

    /// A row of values
    fn values(&mut self, values: &[f64]) -> Result<(), Self::Error>;

    /// One free-form text line
    fn text(&mut self, line: &str) -> Result<(), Self::Error>;

    /// A blank-line request; never produces output
    fn noop(&mut self);
}

/// Writer bound to one [`Role`] and one frame sink
///
/// Each call is validated by the role rules, encoded as one frame and written
/// with a single blocking send. Not internally synchronized: one writer
/// serves one caller.
///
/// For [`Role::Diagnostic`] note that `names` is overloaded: the first call
/// sets the header, later calls send their names as string data.
#[derive(Debug)]
pub struct SocketWriter<S = UnixSocketTransport> {
    router: Router,
    sink: S,
    frames_sent: u64,
    bytes_sent: u64,
}

impl SocketWriter<UnixSocketTransport> {
    /// Connect a new writer for `role` to the socket at `path`
    pub fn connect<P: AsRef<Path>>(path: P, role: Role) -> WriterResult<Self> {
        let transport = UnixSocketTransport::connect(path)?;
        debug!(%role, path = ?transport.path(), "writer connected");
        Ok(Self::new(transport, role))
    }
}

impl<S: FrameSink> SocketWriter<S> {
    /// Wrap an already connected sink
    pub fn new(sink: S, role: Role) -> Self {
        Self {
            router: Router::new(role),
            sink,
            frames_sent: 0,
            bytes_sent: 0,
        }
    }

    /// Route one call and send the resulting frame, if any
    pub fn dispatch(&mut self, call: Call<'_>) -> WriterResult<()> {
        let Some(message) = self.router.route(call)? else {
            return Ok(());
        };

        let frame = codec::encode_frame(&message)?;
        let written = self.sink.send(&frame)?;

        self.frames_sent += 1;
        self.bytes_sent += written as u64;
        trace!(role = %self.router.role(), bytes = written, "frame sent");
        Ok(())
    }

    /// Close the underlying connection; safe to call more than once
    pub fn close(&mut self) -> WriterResult<()> {
        self.sink.close().map_err(WriterError::from)
    }

    pub fn role(&self) -> Role {
        self.router.role()
    }

    pub fn header(&self) -> Option<&[String]> {
        self.router.state().header()
    }

    pub fn adaptation_phase(&self) -> AdaptationPhase {
        self.router.state().adaptation_phase()
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S: FrameSink> Callbacks for SocketWriter<S> {
    type Error = WriterError;

    fn names<N: AsRef<str>>(&mut self, names: &[N]) -> WriterResult<()> {
        let names: Vec<String> = names.iter().map(|n| n.as_ref().to_owned()).collect();
        self.dispatch(Call::Names(&names))
    }

    fn values(&mut self, values: &[f64]) -> WriterResult<()> {
        self.dispatch(Call::Values(values))
    }

    fn text(&mut self, line: &str) -> WriterResult<()> {
        self.dispatch(Call::Text(line))
    }

    fn noop(&mut self) {}
}

/// The three writers one sampling run writes to, each on its own connection
#[derive(Debug)]
pub struct WriterSet<S = UnixSocketTransport> {
    pub init: SocketWriter<S>,
    pub sample: SocketWriter<S>,
    pub diagnostic: SocketWriter<S>,
}

impl WriterSet<UnixSocketTransport> {
    /// Open init, sample and diagnostic writers against one collector socket
    pub fn connect<P: AsRef<Path>>(path: P) -> WriterResult<Self> {
        let path = path.as_ref();
        Ok(Self {
            init: SocketWriter::connect(path, Role::Init)?,
            sample: SocketWriter::connect(path, Role::Sample)?,
            diagnostic: SocketWriter::connect(path, Role::Diagnostic)?,
        })
    }
}

impl<S: FrameSink> WriterSet<S> {
    /// Close all three writers, reporting the first failure
    pub fn close(&mut self) -> WriterResult<()> {
        let init = self.init.close();
        let sample = self.sample.close();
        let diagnostic = self.diagnostic.close();
        init.and(sample).and(diagnostic)
    }

    pub fn frames_sent(&self) -> u64 {
        self.init.frames_sent() + self.sample.frames_sent() + self.diagnostic.frames_sent()
    }
}
