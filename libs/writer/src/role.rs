//! Writer roles
//!
//! A writer is bound to one role when it is created and keeps it for its
//! whole life. The role decides which call shapes are legal and which topic
//! outgoing messages carry.

use crate::error::ParseRoleError;
use std::fmt;
use std::str::FromStr;
use types::Topic;

/// Output channel a writer serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Unconstrained initial values; one value row per init event
    Init,
    /// Draws, preceded by a column header and interleaved text notes
    Sample,
    /// Sampler diagnostics.
    ///
    /// **Surprising contract:** the first `names` call sets the column header
    /// and sends nothing, but every later `names` call is treated as string
    /// data and sent as a `DIAGNOSTIC` bytes-list message. Downstream
    /// consumers rely on this; do not "fix" it.
    Diagnostic,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Init, Role::Sample, Role::Diagnostic];

    /// Topic carried by every message this role sends
    pub fn topic(self) -> Topic {
        match self {
            Role::Init => Topic::Initialization,
            Role::Sample => Topic::Sample,
            Role::Diagnostic => Topic::Diagnostic,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Init => "init",
            Role::Sample => "sample",
            Role::Diagnostic => "diagnostic",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    /// Accepts `sample` as well as the `sample_writer:` prefix form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim_end_matches(':');
        let name = name.strip_suffix("_writer").unwrap_or(name);

        match name {
            "init" => Ok(Role::Init),
            "sample" => Ok(Role::Sample),
            "diagnostic" => Ok(Role::Diagnostic),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}
