//! # Fit Collector
//!
//! Receiving end for Drawstream writers: listens on a Unix socket, stores
//! every frame it receives in a fit file, and renders fit files as JSON
//! lines for inspection.
//!
//! A fit file is the concatenation of received frames, each
//! `[varint32 length][WriterMessage body]`, so it can be read back with
//! [`codec::decode_frames`].

pub mod collector;
pub mod dump;
pub mod error;
pub mod stats;

pub use collector::{CollectorSummary, FitCollector, DEFAULT_DRAIN_TIMEOUT};
pub use dump::{dump_file, dump_frames, render_message};
pub use error::{CollectorError, CollectorResult};
pub use stats::TopicCounts;
