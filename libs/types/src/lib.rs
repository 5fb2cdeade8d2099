//! # Drawstream Types
//!
//! Wire schema shared by every Drawstream crate: the `WriterMessage` record
//! that writers emit and collectors decode.
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types → codec/ → network/ → writer/
//!     ↑          ↓          ↓          ↓
//! Pure Data   Framing    Sockets    Role rules
//! ```
//!
//! The structs here are prost messages written in the same shape prost-build
//! generates, so any protobuf consumer with the matching `.proto` can read
//! them. Convenience constructors live next to the schema so callers never
//! assemble a message field by field.
//!
//! ```rust
//! use types::{Feature, Topic, WriterMessage};
//!
//! let message = WriterMessage::new(
//!     Topic::Sample,
//!     vec![Feature::doubles("lp__", vec![-7.2])],
//! );
//! assert_eq!(message.topic(), Topic::Sample);
//! ```

pub mod schema;

pub use schema::{
    writer_message::{feature::Kind as FeatureKind, BytesList, DoubleList, Feature, Topic},
    WriterMessage,
};
