//! Error types for simulation sessions.

use sc_controls::{ControlError, HandleKind};
use thiserror::Error;

/// Errors encountered while opening, stepping or closing a simulation.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: String },

    /// A referenced node or link does not exist in the network definition.
    #[error("Unknown {kind} '{name}'")]
    UnknownHandle { kind: HandleKind, name: String },

    /// The engine failed to initialize, step or finalize. Never retried.
    #[error("Engine failure: {message}")]
    EngineFailure { message: String },

    #[error("Control setup failed: {0}")]
    Control(ControlError),

    #[error("Failed to write report {path}: {message}")]
    Report { path: String, message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<ControlError> for SimError {
    fn from(e: ControlError) -> Self {
        match e {
            ControlError::UnknownHandle { kind, name } => SimError::UnknownHandle { kind, name },
            other => SimError::Control(other),
        }
    }
}

impl From<sc_core::CoreError> for SimError {
    fn from(e: sc_core::CoreError) -> Self {
        SimError::InvalidArg {
            what: e.to_string(),
        }
    }
}
