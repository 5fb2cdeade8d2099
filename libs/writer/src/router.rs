//! # Role Router - call validation and message shaping
//!
//! ## Purpose
//!
//! Decides, for one call on one writer, whether the call is legal and which
//! message (if any) it produces. Routing is a pure state transition over
//! [`WriterState`]; no I/O happens here, so every role rule can be tested
//! without a socket.
//!
//! ## Rules
//!
//! | Role | `names` | `values` | `text` |
//! |---|---|---|---|
//! | init | violation | `INITIALIZATION`, one unnamed double list | violation |
//! | sample | header once, then violation | header + phase gate, one named double per field | advance phase, `SAMPLE` unnamed bytes |
//! | diagnostic | header once, then `DIAGNOSTIC` bytes list | header gate, one named double per field | `DIAGNOSTIC` unnamed bytes |
//!
//! `noop` never produces a message or touches state, for every role.

use crate::adaptation::AdaptationPhase;
use crate::error::{CallShape, ProtocolViolation};
use crate::role::Role;
use tracing::{debug, info};
use types::{Feature, Topic, WriterMessage};

/// One call from the upstream computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Call<'a> {
    Names(&'a [String]),
    Values(&'a [f64]),
    Text(&'a str),
    Noop,
}

impl Call<'_> {
    pub fn shape(&self) -> CallShape {
        match self {
            Call::Names(_) => CallShape::Names,
            Call::Values(_) => CallShape::Values,
            Call::Text(_) => CallShape::Text,
            Call::Noop => CallShape::Noop,
        }
    }
}

/// State accumulated by one writer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriterState {
    header: Option<Vec<String>>,
    phase: AdaptationPhase,
}

impl WriterState {
    /// Column names, once the first `names` call has set them
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    pub fn adaptation_phase(&self) -> AdaptationPhase {
        self.phase
    }
}

/// Validates calls for a fixed role and builds their messages
#[derive(Debug, Clone)]
pub struct Router {
    role: Role,
    state: WriterState,
}

impl Router {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            state: WriterState::default(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> &WriterState {
        &self.state
    }

    /// Apply one call, returning the message to send, if any
    ///
    /// A rejected call leaves the state exactly as it was.
    pub fn route(&mut self, call: Call<'_>) -> Result<Option<WriterMessage>, ProtocolViolation> {
        match (self.role, call) {
            (_, Call::Noop) => Ok(None),

            (Role::Init, Call::Values(values)) => Ok(Some(WriterMessage::new(
                Topic::Initialization,
                vec![Feature::unnamed_doubles(values.to_vec())],
            ))),
            (Role::Init, call) => Err(ProtocolViolation::UnexpectedCall {
                role: Role::Init,
                call: call.shape(),
            }),

            (Role::Sample, Call::Names(names)) => {
                if self.state.header.is_some() {
                    return Err(ProtocolViolation::DuplicateHeader { role: Role::Sample });
                }
                self.capture_header(names);
                Ok(None)
            }
            (Role::Sample, Call::Values(values)) => {
                let features = self.header_row(values)?;
                if !self.state.phase.accepts_values() {
                    return Err(ProtocolViolation::AdaptationInProgress {
                        phase: self.state.phase,
                    });
                }
                Ok(Some(WriterMessage::new(Topic::Sample, features)))
            }
            (Role::Sample, Call::Text(line)) => {
                self.observe_sample_text(line);
                Ok(Some(text_message(Topic::Sample, line)))
            }

            (Role::Diagnostic, Call::Names(names)) => {
                if self.state.header.is_none() {
                    self.capture_header(names);
                    return Ok(None);
                }
                // after the header, names carry string data
                let values = names.iter().map(|name| name.as_bytes().to_vec()).collect();
                Ok(Some(WriterMessage::new(
                    Topic::Diagnostic,
                    vec![Feature::unnamed_bytes(values)],
                )))
            }
            (Role::Diagnostic, Call::Values(values)) => {
                let features = self.header_row(values)?;
                Ok(Some(WriterMessage::new(Topic::Diagnostic, features)))
            }
            (Role::Diagnostic, Call::Text(line)) => Ok(Some(text_message(Topic::Diagnostic, line))),
        }
    }

    fn capture_header(&mut self, names: &[String]) {
        debug!(role = %self.role, fields = names.len(), "captured column header");
        self.state.header = Some(names.to_vec());
    }

    /// One named single-value feature per header field
    fn header_row(&self, values: &[f64]) -> Result<Vec<Feature>, ProtocolViolation> {
        let header = self
            .state
            .header
            .as_ref()
            .ok_or(ProtocolViolation::HeaderNotSet { role: self.role })?;

        if header.len() != values.len() {
            return Err(ProtocolViolation::ValueCountMismatch {
                role: self.role,
                expected: header.len(),
                got: values.len(),
            });
        }

        Ok(header
            .iter()
            .zip(values)
            .map(|(name, &value)| Feature::doubles(name.clone(), vec![value]))
            .collect())
    }

    fn observe_sample_text(&mut self, line: &str) {
        let next = self.state.phase.advance(line);
        if next != self.state.phase {
            info!(from = %self.state.phase, to = %next, "adaptation phase changed");
            self.state.phase = next;
        }
    }
}

fn text_message(topic: Topic, line: &str) -> WriterMessage {
    WriterMessage::new(
        topic,
        vec![Feature::unnamed_bytes(vec![line.as_bytes().to_vec()])],
    )
}
