//! Error types for the sc-app service layer.

use std::path::PathBuf;

use sc_controls::{ControlError, HandleKind};
use sc_sim::SimError;

/// Application error type that wraps errors from the backend crates and
/// provides a unified error interface for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario error: {0}")]
    Project(String),

    #[error("Failed to read scenario file: {path}")]
    ScenarioFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write scenario file: {path}")]
    ScenarioFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Scenario validation failed: {0}")]
    Validation(String),

    #[error("Invalid control curve: {0}")]
    InvalidCurve(String),

    #[error("Unknown {kind} '{name}'")]
    UnknownHandle { kind: HandleKind, name: String },

    #[error("Runtime compilation failed: {0}")]
    Compile(String),

    #[error("Engine failure: {0}")]
    EngineFailure(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sc-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<sc_project::ProjectError> for AppError {
    fn from(err: sc_project::ProjectError) -> Self {
        match err {
            sc_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<sc_project::ValidationError> for AppError {
    fn from(err: sc_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<ControlError> for AppError {
    fn from(err: ControlError) -> Self {
        match err {
            ControlError::UnknownHandle { kind, name } => AppError::UnknownHandle { kind, name },
            ControlError::InvalidCurve { what } => AppError::InvalidCurve(what),
            other => AppError::Compile(other.to_string()),
        }
    }
}

impl From<SimError> for AppError {
    fn from(err: SimError) -> Self {
        match err {
            SimError::UnknownHandle { kind, name } => AppError::UnknownHandle { kind, name },
            SimError::EngineFailure { message } => AppError::EngineFailure(message),
            SimError::Control(e) => e.into(),
            other => AppError::Simulation(other.to_string()),
        }
    }
}

impl From<sc_results::ResultsError> for AppError {
    fn from(err: sc_results::ResultsError) -> Self {
        match err {
            sc_results::ResultsError::UnknownHandle { name, .. } => AppError::UnknownHandle {
                kind: HandleKind::Node,
                name,
            },
            other => AppError::Results(other.to_string()),
        }
    }
}
