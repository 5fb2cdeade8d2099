//! # Drawstream Writer - role-specialized callback writers
//!
//! ## Purpose
//!
//! Turns the ordered callback sequence of an iterative sampler (column
//! names, value rows, text lines, no-ops) into framed `WriterMessage`s on a
//! Unix socket. Each writer is bound to one [`Role`] at construction:
//!
//! - `init`: one `INITIALIZATION` message per value row
//! - `sample`: column header once, then draws; text lines drive the
//!   [`AdaptationPhase`] detector, which rejects value rows while the
//!   adaptation report is being written
//! - `diagnostic`: column header once, then rows, text and string data
//!
//! ## Architecture Role
//!
//! ```text
//! sampler callbacks → [Router] → codec::encode_frame → network::FrameSink
//!                        ↑
//!               WriterState (header, phase)
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use writer::{Callbacks, Role, SocketWriter};
//!
//! let mut sample = SocketWriter::connect("/tmp/drawstream/fit.sock", Role::Sample)?;
//! sample.names(&["lp__", "accept_stat__"])?;
//! sample.values(&[-3.167e-06, 0.999965])?;
//! # Ok::<(), writer::WriterError>(())
//! ```

pub mod adaptation;
pub mod error;
pub mod role;
pub mod router;
pub mod socket_writer;

pub use adaptation::{AdaptationPhase, ADAPTATION_TERMINATED, INVERSE_MASS_MATRIX};
pub use error::{CallShape, ParseRoleError, ProtocolViolation, WriterError, WriterResult};
pub use role::Role;
pub use router::{Call, Router, WriterState};
pub use socket_writer::{Callbacks, SocketWriter, WriterSet};
