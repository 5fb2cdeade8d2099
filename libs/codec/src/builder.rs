//! # Frame Builder - measure, prefix, serialize
//!
//! ## Purpose
//!
//! Turns one complete `WriterMessage` into one self-delimiting frame. The
//! body length is measured first and written as a varint32 prefix, then the
//! body follows, all in a single contiguous buffer. Receivers read the
//! prefix and then exactly that many bytes; no delimiter scanning.
//!
//! ## Architecture
//!
//! ```text
//! writer/ → [encode_frame] → Bytes → network/ (one send per frame)
//! ```

use crate::error::{CodecError, CodecResult};
use bytes::{BufMut, Bytes, BytesMut};
use prost::Message;
use tracing::trace;
use types::WriterMessage;

/// Append `value` as a varint32 to `buf`
#[inline]
pub fn write_varint32(value: u32, buf: &mut impl BufMut) {
    prost::encoding::encode_varint(u64::from(value), buf);
}

/// Number of bytes `value` occupies as a varint32
#[inline]
pub fn varint32_len(value: u32) -> usize {
    prost::encoding::encoded_len_varint(u64::from(value))
}

/// Encode `message` as `[varint32 length][body]`
pub fn encode_frame(message: &WriterMessage) -> CodecResult<Bytes> {
    let mut buf = BytesMut::new();
    encode_frame_into(message, &mut buf)?;
    Ok(buf.freeze())
}

/// Append the frame for `message` to `buf`, returning the frame length
pub fn encode_frame_into(message: &WriterMessage, buf: &mut BytesMut) -> CodecResult<usize> {
    let body_len = message.encoded_len();
    let prefix = u32::try_from(body_len)
        .map_err(|_| CodecError::encoding(body_len, "body length does not fit in varint32"))?;

    let frame_len = varint32_len(prefix) + body_len;
    buf.reserve(frame_len);

    let start = buf.len();
    write_varint32(prefix, buf);
    message
        .encode(buf)
        .map_err(|e| CodecError::encoding(body_len, e.to_string()))?;

    let written = buf.len() - start;
    if written != frame_len {
        return Err(CodecError::encoding(
            body_len,
            format!("wrote {} bytes, measured {}", written, frame_len),
        ));
    }

    trace!(
        topic = message.topic().as_str_name(),
        features = message.feature.len(),
        body_len,
        "encoded frame"
    );
    Ok(frame_len)
}
