//! End-to-End Test Harness for Drawstream
//!
//! Runs real writers against a real frame listener on a Unix socket in a
//! temporary directory and captures what arrives, one message list per
//! writer connection.

pub mod harness;

pub use harness::{init_test_logging, Capture, CaptureListener};
