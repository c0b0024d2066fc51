use std::fmt;

use crate::counting::CountingError;
use crate::data::DataError;

/// Represents the different types of errors that can occur in the text classifier.
#[derive(Debug)]
pub enum ClassifierError {
    /// Error occurred during the build phase
    BuildError(String),
    /// Error occurred while training
    TrainingError(String),
    /// Error occurred while making predictions
    PredictionError(String),
    /// Error occurred due to invalid input parameters
    ValidationError(String),
    /// Error raised by the underlying count tables
    CountingError(CountingError),
    /// Error occurred while loading configuration or data
    DataError(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BuildError(msg) => write!(f, "Build error: {}", msg),
            Self::TrainingError(msg) => write!(f, "Training error: {}", msg),
            Self::PredictionError(msg) => write!(f, "Prediction error: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::CountingError(err) => write!(f, "Counting error: {}", err),
            Self::DataError(msg) => write!(f, "Data error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CountingError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CountingError> for ClassifierError {
    fn from(err: CountingError) -> Self {
        ClassifierError::CountingError(err)
    }
}

impl From<DataError> for ClassifierError {
    fn from(err: DataError) -> Self {
        ClassifierError::DataError(err.to_string())
    }
}
