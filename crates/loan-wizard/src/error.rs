use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::loan_application::{
    AttachError, NavigationError, StepKey, SubmissionError,
};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Draft(serde_json::Error),
    Export(csv::Error),
    Attach(AttachError),
    Navigation(NavigationError),
    Submission(SubmissionError),
    Blocked(StepKey),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Draft(err) => write!(f, "draft file error: {}", err),
            AppError::Export(err) => write!(f, "export error: {}", err),
            AppError::Attach(err) => write!(f, "document error: {}", err),
            AppError::Navigation(err) => write!(f, "navigation error: {}", err),
            AppError::Submission(err) => write!(f, "submission error: {}", err),
            AppError::Blocked(step) => write!(f, "{} has missing or invalid fields", step),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Draft(err) => Some(err),
            AppError::Export(err) => Some(err),
            AppError::Attach(err) => Some(err),
            AppError::Navigation(err) => Some(err),
            AppError::Submission(err) => Some(err),
            AppError::Blocked(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Draft(value)
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        Self::Export(value)
    }
}

impl From<AttachError> for AppError {
    fn from(value: AttachError) -> Self {
        Self::Attach(value)
    }
}

impl From<NavigationError> for AppError {
    fn from(value: NavigationError) -> Self {
        Self::Navigation(value)
    }
}

impl From<SubmissionError> for AppError {
    fn from(value: SubmissionError) -> Self {
        Self::Submission(value)
    }
}
