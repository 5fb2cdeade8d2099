//! Writer errors
//!
//! Protocol violations are raised at the offending call and leave the
//! writer's state untouched. Transport and encoding failures pass through
//! unchanged.

use crate::adaptation::AdaptationPhase;
use crate::role::Role;
use codec::CodecError;
use network::TransportError;
use std::fmt;
use thiserror::Error;

/// The four call shapes a writer accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallShape {
    Names,
    Values,
    Text,
    Noop,
}

impl fmt::Display for CallShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CallShape::Names => "names",
            CallShape::Values => "values",
            CallShape::Text => "text",
            CallShape::Noop => "noop",
        })
    }
}

/// A call that is illegal for the writer's role or current state
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProtocolViolation {
    #[error("unexpected {call} call for {role} writer")]
    UnexpectedCall { role: Role, call: CallShape },

    #[error("{role} writer received values before its header was set")]
    HeaderNotSet { role: Role },

    #[error("unexpected names call for {role} writer after column header")]
    DuplicateHeader { role: Role },

    #[error("sample writer received values while adaptation is {phase}; values are accepted only before or after adaptation")]
    AdaptationInProgress { phase: AdaptationPhase },

    #[error("{role} writer received {got} values for a {expected} field header")]
    ValueCountMismatch {
        role: Role,
        expected: usize,
        got: usize,
    },
}

/// Unrecognized role name
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown writer role {0:?} (expected init, sample or diagnostic)")]
pub struct ParseRoleError(pub String);

/// Any failure surfaced by a writer call
#[derive(Debug, Error)]
pub enum WriterError {
    #[error("Protocol violation: {0}")]
    Protocol(#[from] ProtocolViolation),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Encoding failed: {0}")]
    Encoding(#[from] CodecError),
}

impl WriterError {
    pub fn as_protocol(&self) -> Option<&ProtocolViolation> {
        match self {
            WriterError::Protocol(violation) => Some(violation),
            _ => None,
        }
    }
}

/// Result type for writer operations
pub type WriterResult<T> = std::result::Result<T, WriterError>;
