//! # Drawstream Codec - Frame Encoding and Decoding
//!
//! ## Purpose
//!
//! This crate contains the "Rules" layer for the writer wire format:
//! - Frame construction: measure the body, prefix its varint32 length,
//!   append the body
//! - Frame parsing: incremental decoding over arbitrary chunk boundaries
//! - Whole-stream decoding for saved fit output
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types → [codec] → network/
//!     ↑           ↓          ↓
//! Pure Data   Framing    Transport
//! Schema      Rules      Connections
//! ```
//!
//! ## What This Crate Does NOT Contain
//! - Network transport logic (belongs in network/)
//! - Role validation of writer calls (belongs in writer/)

pub mod builder;
pub mod constants;
pub mod error;
pub mod parser;

pub use builder::{encode_frame, encode_frame_into, varint32_len, write_varint32};
pub use constants::*;
pub use error::{CodecError, CodecResult};
pub use parser::{decode_body, decode_frames, read_varint32, FrameDecoder};
