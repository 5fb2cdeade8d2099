//! Adaptation phase detection for the sample channel
//!
//! The upstream sampler reports the end of warmup adaptation only through
//! free-form text written to the sample writer, e.g.
//!
//! ```text
//! "Adaptation terminated"
//! "Step size = 0.809818"
//! "Diagonal elements of inverse mass matrix:"
//! "0.961989"
//! ```
//!
//! While those notes are being written, value rows are not draws. The phase
//! advances on exact line prefixes only and never moves backwards.

use std::fmt;

/// Prefix of the line that opens the adaptation report
pub const ADAPTATION_TERMINATED: &str = "Adaptation terminated";

/// Prefix of the line announcing the final adaptation message
pub const INVERSE_MASS_MATRIX: &str = "Diagonal elements of inverse mass matrix";

/// Where the sample channel is relative to the adaptation report
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum AdaptationPhase {
    /// No report seen yet; also the permanent state when adaptation is off
    #[default]
    Before,
    /// Report started, tuning notes in progress
    During,
    /// Next text line is the last one of the report
    Final,
    /// Report finished; value rows are draws again
    After,
}

impl AdaptationPhase {
    /// Phase after observing one text line
    pub fn advance(self, line: &str) -> Self {
        match self {
            Self::Before if line.starts_with(ADAPTATION_TERMINATED) => Self::During,
            Self::During if line.starts_with(INVERSE_MASS_MATRIX) => Self::Final,
            Self::Final => Self::After,
            phase => phase,
        }
    }

    /// Whether a value row may be written in this phase
    pub fn accepts_values(self) -> bool {
        matches!(self, Self::Before | Self::After)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::During => "during",
            Self::Final => "final",
            Self::After => "after",
        }
    }
}

impl fmt::Display for AdaptationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
