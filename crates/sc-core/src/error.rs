use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while checking raw network quantities.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("{what} must be finite, got {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("{what} must not be negative, got {value}")]
    Negative { what: &'static str, value: f64 },
}
