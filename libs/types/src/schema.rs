//! `WriterMessage` protobuf schema
//!
//! Mirrors this proto3 definition, field numbers included:
//!
//! ```proto
//! message WriterMessage {
//!   enum Topic { SAMPLE = 0; DIAGNOSTIC = 1; INITIALIZATION = 2; }
//!   message BytesList  { repeated bytes  value = 1; }
//!   message DoubleList { repeated double value = 1 [packed = true]; }
//!   message Feature {
//!     string name = 1;
//!     oneof kind { BytesList bytes_list = 2; DoubleList double_list = 3; }
//!   }
//!   Topic topic = 1;
//!   repeated Feature feature = 2;
//! }
//! ```
//!
//! Receivers depend on the numeric topic tags; never renumber them.

/// One framed unit emitted by a writer: a topic plus ordered features.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WriterMessage {
    #[prost(enumeration = "writer_message::Topic", tag = "1")]
    pub topic: i32,
    #[prost(message, repeated, tag = "2")]
    pub feature: Vec<writer_message::Feature>,
}

/// Nested message and enum types in `WriterMessage`.
pub mod writer_message {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct BytesList {
        #[prost(bytes = "vec", repeated, tag = "1")]
        pub value: Vec<Vec<u8>>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct DoubleList {
        #[prost(double, repeated, tag = "1")]
        pub value: Vec<f64>,
    }

    /// A named (or unnamed, when `name` is empty) payload slot.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Feature {
        #[prost(string, tag = "1")]
        pub name: String,
        #[prost(oneof = "feature::Kind", tags = "2, 3")]
        pub kind: Option<feature::Kind>,
    }

    /// Nested message and enum types in `Feature`.
    pub mod feature {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum Kind {
            #[prost(message, tag = "2")]
            BytesList(super::BytesList),
            #[prost(message, tag = "3")]
            DoubleList(super::DoubleList),
        }
    }

    /// Logical channel a message belongs to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Topic {
        Sample = 0,
        Diagnostic = 1,
        Initialization = 2,
    }

    impl Topic {
        /// String value of the enum field names used in the ProtoBuf definition.
        pub fn as_str_name(&self) -> &'static str {
            match self {
                Topic::Sample => "SAMPLE",
                Topic::Diagnostic => "DIAGNOSTIC",
                Topic::Initialization => "INITIALIZATION",
            }
        }

        /// Creates an enum from field names used in the ProtoBuf definition.
        pub fn from_str_name(value: &str) -> Option<Self> {
            match value {
                "SAMPLE" => Some(Self::Sample),
                "DIAGNOSTIC" => Some(Self::Diagnostic),
                "INITIALIZATION" => Some(Self::Initialization),
                _ => None,
            }
        }
    }

    impl std::fmt::Display for Topic {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.as_str_name())
        }
    }

    impl Feature {
        /// Named feature carrying floating-point values
        pub fn doubles(name: impl Into<String>, values: Vec<f64>) -> Self {
            Self {
                name: name.into(),
                kind: Some(feature::Kind::DoubleList(DoubleList { value: values })),
            }
        }

        /// Unnamed feature carrying floating-point values
        pub fn unnamed_doubles(values: Vec<f64>) -> Self {
            Self::doubles(String::new(), values)
        }

        /// Named feature carrying byte strings
        pub fn bytes(name: impl Into<String>, values: Vec<Vec<u8>>) -> Self {
            Self {
                name: name.into(),
                kind: Some(feature::Kind::BytesList(BytesList { value: values })),
            }
        }

        /// Unnamed feature carrying byte strings
        pub fn unnamed_bytes(values: Vec<Vec<u8>>) -> Self {
            Self::bytes(String::new(), values)
        }

        /// Feature name, `None` when unnamed
        pub fn name(&self) -> Option<&str> {
            if self.name.is_empty() {
                None
            } else {
                Some(&self.name)
            }
        }

        pub fn double_values(&self) -> Option<&[f64]> {
            match &self.kind {
                Some(feature::Kind::DoubleList(list)) => Some(&list.value),
                _ => None,
            }
        }

        pub fn bytes_values(&self) -> Option<&[Vec<u8>]> {
            match &self.kind {
                Some(feature::Kind::BytesList(list)) => Some(&list.value),
                _ => None,
            }
        }
    }
}

impl WriterMessage {
    /// Build a complete message from its topic and features
    pub fn new(topic: writer_message::Topic, features: Vec<writer_message::Feature>) -> Self {
        Self {
            topic: topic as i32,
            feature: features,
        }
    }

    pub fn features(&self) -> &[writer_message::Feature] {
        &self.feature
    }
}
