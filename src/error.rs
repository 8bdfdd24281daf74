// Copyright @yucwang 2026

use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub enum EstimateError {
    Io(std::io::Error),
    Parse { line: usize, message: String },
    Validation(String),
    TaskFailure { task: usize, message: String },
    TaskTimeout { task: usize, timeout: Duration },
    Visualization(String),
}

impl EstimateError {
    pub fn parse<S: Into<String>>(line: usize, message: S) -> Self {
        EstimateError::Parse { line, message: message.into() }
    }

    /// True for errors raised while loading input, before any task is dispatched.
    pub fn is_parse_stage(&self) -> bool {
        match self {
            EstimateError::Io(_) | EstimateError::Parse { .. } | EstimateError::Validation(_) => true,
            _ => false,
        }
    }
}

impl From<std::io::Error> for EstimateError {
    fn from(err: std::io::Error) -> Self {
        EstimateError::Io(err)
    }
}

impl From<image::ImageError> for EstimateError {
    fn from(err: image::ImageError) -> Self {
        EstimateError::Visualization(err.to_string())
    }
}

impl fmt::Display for EstimateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimateError::Io(err) => write!(f, "io error: {}", err),
            EstimateError::Parse { line, message } => write!(f, "parse error at line {}: {}", line, message),
            EstimateError::Validation(message) => write!(f, "validation error: {}", message),
            EstimateError::TaskFailure { task, message } => write!(f, "task {} failed: {}", task, message),
            EstimateError::TaskTimeout { task, timeout } => {
                write!(f, "task {} did not finish within {:.3}s", task, timeout.as_secs_f64())
            }
            EstimateError::Visualization(message) => write!(f, "visualization error: {}", message),
        }
    }
}

impl std::error::Error for EstimateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EstimateError::Io(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EstimateError>;
