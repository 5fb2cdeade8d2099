//! # Framing Constants
//!
//! Values shared by the encoder and every decoder of the frame stream. They
//! must stay stable: receivers size buffers and reject frames based on them.
//!
//! ```text
//! ┌─────────────────────────┬──────────────────────────────┐
//! │ Length (1-5 bytes)      │ Body (length bytes)          │
//! │ varint32, little-endian │ protobuf WriterMessage       │
//! └─────────────────────────┴──────────────────────────────┘
//! ```

/// Longest possible varint32 encoding
pub const MAX_VARINT32_LEN: usize = 5;

/// Default upper bound on a single frame body accepted by decoders (16MB)
pub const DEFAULT_MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;
