//! Error types shared by all optimizers.

use thiserror::Error;

/// Crate-level error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("objective evaluation error: {0}")]
    ObjectiveEvaluation(#[from] ObjectiveEvaluationError),

    #[error("iteration budget of {max_iterations} exhausted")]
    Exhausted { max_iterations: usize },
}

/// A parameter was rejected when an optimizer was constructed.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid `{parameter}`: {message}")]
pub struct ConfigurationError {
    pub parameter: &'static str,
    pub message: String,
}

impl ConfigurationError {
    pub fn new(parameter: &'static str, message: impl Into<String>) -> Self {
        Self {
            parameter,
            message: message.into(),
        }
    }
}

/// The objective returned NaN or an infinity.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("objective returned non-finite value {value} at {position:?}")]
pub struct ObjectiveEvaluationError {
    pub value: f64,
    pub position: Vec<f64>,
}

pub type Result<T> = std::result::Result<T, Error>;
