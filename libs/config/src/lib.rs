//! # Drawstream Configuration
//!
//! Settings shared by writers and the fit collector: where the collector
//! socket lives, how large a frame the receiving side accepts, and where
//! collected output goes.
//!
//! ## Sources
//!
//! Later sources override earlier ones:
//!
//! 1. Built-in defaults
//! 2. A TOML file (`drawstream.toml` unless a path is given)
//! 3. `DRAWSTREAM_`-prefixed environment variables, with `__` between
//!    section and key (`DRAWSTREAM_SOCKET__PATH=/run/fit.sock`)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use drawstream_config::load_config;
//!
//! let config = load_config(None).unwrap();
//! let listener_config = config.socket.to_socket_config();
//! ```

pub mod settings;

pub use settings::{load_config, CollectorSettings, DrawstreamConfig, SocketSettings};
