use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{Column, ValidationError};

/// Why the model artifact could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Model file '{}' not found. Make sure it sits in the working directory or pass --model.", path.display())]
    Missing { path: PathBuf },

    #[error("Failed to read model file '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Model file '{}' is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },
}

impl LoadError {
    pub fn path(&self) -> &PathBuf {
        match self {
            LoadError::Missing { path }
            | LoadError::Unreadable { path, .. }
            | LoadError::Corrupt { path, .. } => path,
        }
    }
}

/// An artifact-side failure during inference. The caller cannot fix it by
/// changing the input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("schema mismatch: model expects feature '{0}' which the record does not carry")]
    UnknownFeature(String),

    #[error("schema mismatch: model does not consume feature '{0}'")]
    MissingFeature(Column),

    #[error("schema mismatch: '{value}' is not in the model's vocabulary for '{column}'")]
    UnseenCategory { column: Column, value: String },

    #[error("schema mismatch: '{0}' has a different type in the model")]
    TypeMismatch(Column),

    #[error("model produced a non-finite score")]
    NonFiniteOutput,
}

/// Result of a prediction request.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("prediction failed: {0}")]
    Model(#[from] ModelError),

    #[error("prediction unavailable: the model failed to load")]
    Unavailable,
}

impl PredictError {
    /// Follow-up hint shown under the error message.
    pub fn hint(&self) -> &'static str {
        match self {
            PredictError::Validation(_) => "Correct the highlighted input and try again.",
            PredictError::Model(_) => "Make sure the model was trained with matching feature columns.",
            PredictError::Unavailable => "Fix the model file and restart.",
        }
    }
}
