use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Category of a recoverable booking failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    FieldRequired,
    FieldOutOfRange,
    FieldFormatInvalid,
    DateOrderInvalid,
    StepGateFailed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::FieldRequired => "field required",
            ErrorKind::FieldOutOfRange => "field out of range",
            ErrorKind::FieldFormatInvalid => "invalid format",
            ErrorKind::DateOrderInvalid => "invalid date order",
            ErrorKind::StepGateFailed => "step gate failed",
        };
        f.write_str(label)
    }
}

/// Error type that captures infrastructure failures around the booking core.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, BookingError>;

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BookingError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        CliError::Input(err.to_string())
    }
}
