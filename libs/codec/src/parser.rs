//! # Frame Parser - incremental decoding of the frame stream
//!
//! ## Purpose
//!
//! Splits a byte stream of `[varint32 length][body]` frames back into
//! `WriterMessage` values. The stream may arrive in arbitrary chunks (socket
//! reads) or all at once (a saved fit file); `FrameDecoder` handles both.
//!
//! A frame is only consumed once its prefix and its full body are buffered.
//! Oversized declared lengths are rejected before any body bytes are waited
//! for, so a corrupted prefix cannot make the decoder buffer without bound.

use crate::constants::{DEFAULT_MAX_FRAME_SIZE, MAX_VARINT32_LEN};
use crate::error::{CodecError, CodecResult};
use bytes::{Buf, Bytes, BytesMut};
use prost::Message;
use tracing::debug;
use types::WriterMessage;

/// Read a varint32 from the start of `data`
///
/// Returns `Ok(None)` when `data` ends before the varint does, otherwise the
/// value and the number of prefix bytes consumed.
pub fn read_varint32(data: &[u8]) -> CodecResult<Option<(u32, usize)>> {
    let mut value: u32 = 0;

    for (i, &byte) in data.iter().take(MAX_VARINT32_LEN).enumerate() {
        if i == MAX_VARINT32_LEN - 1 && byte > 0x0F {
            return Err(CodecError::malformed_length(i + 1, "value exceeds 32 bits"));
        }

        value |= u32::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(Some((value, i + 1)));
        }
    }

    // the fifth byte either terminates or errors above
    Ok(None)
}

/// Decode one frame body (without its prefix)
pub fn decode_body(body: &[u8]) -> CodecResult<WriterMessage> {
    WriterMessage::decode(body).map_err(|e| CodecError::decode(body.len(), e.to_string()))
}

/// Decode every frame in a complete stream, e.g. a saved fit file
///
/// Trailing bytes that do not form a complete frame are an error.
pub fn decode_frames(data: &[u8]) -> CodecResult<Vec<WriterMessage>> {
    let mut decoder = FrameDecoder::with_max_frame_size(u32::MAX as usize);
    decoder.extend(data);

    let mut messages = Vec::new();
    while let Some(message) = decoder.next_frame()? {
        messages.push(message);
    }
    decoder.finish()?;
    Ok(messages)
}

/// Incremental frame decoder
#[derive(Debug)]
pub struct FrameDecoder {
    buffer: BytesMut,
    max_frame_size: usize,
    frames_decoded: u64,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::with_max_frame_size(DEFAULT_MAX_FRAME_SIZE)
    }

    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self {
            buffer: BytesMut::new(),
            max_frame_size,
            frames_decoded: 0,
        }
    }

    /// Append received bytes
    pub fn extend(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Next complete frame body, if one is fully buffered
    pub fn next_body(&mut self) -> CodecResult<Option<Bytes>> {
        let Some((len, prefix_len)) = read_varint32(&self.buffer)? else {
            return Ok(None);
        };

        let len = len as usize;
        if len > self.max_frame_size {
            return Err(CodecError::FrameTooLarge {
                size: len,
                max: self.max_frame_size,
            });
        }

        if self.buffer.len() < prefix_len + len {
            return Ok(None);
        }

        self.buffer.advance(prefix_len);
        self.frames_decoded += 1;
        Ok(Some(self.buffer.split_to(len).freeze()))
    }

    /// Next complete frame, decoded
    pub fn next_frame(&mut self) -> CodecResult<Option<WriterMessage>> {
        match self.next_body()? {
            Some(body) => decode_body(&body).map(Some),
            None => Ok(None),
        }
    }

    /// Bytes received but not yet consumed as a frame
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }

    /// Check that the stream ended on a frame boundary
    pub fn finish(self) -> CodecResult<()> {
        if !self.buffer.is_empty() {
            return Err(CodecError::TruncatedFrame {
                buffered: self.buffer.len(),
            });
        }
        debug!(frames = self.frames_decoded, "frame stream complete");
        Ok(())
    }
}
