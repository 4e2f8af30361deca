//! Error types for control setup.

use std::fmt;

use thiserror::Error;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Kind of engine element a name was expected to resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Node,
    Link,
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => f.write_str("node"),
            Self::Link => f.write_str("link"),
        }
    }
}

/// Errors raised while building curves or compiling control rules.
///
/// All of these are configuration-time errors: once a controller has been
/// compiled, evaluating it never fails.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Malformed breakpoint data.
    #[error("Invalid control curve: {what}")]
    InvalidCurve { what: String },

    /// A rule references a node or link that the network does not define.
    #[error("Unknown {kind} '{name}'")]
    UnknownHandle { kind: HandleKind, name: String },

    /// Invalid argument provided to a rule.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },
}
