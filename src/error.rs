//! Top-level application error.
//!
//! Library modules return typed errors; the binary converts them into an
//! `AppError` carrying the process exit code:
//!
//! - 2: invalid input or configuration
//! - 3: model artifact could not be loaded
//! - 4: model failed during inference
//! - 5: terminal or file I/O

use crate::config::ConfigError;
use crate::models::{LoadError, PredictError};

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(2, err.to_string())
    }
}

impl From<&LoadError> for AppError {
    fn from(err: &LoadError) -> Self {
        AppError::new(3, err.to_string())
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        let code = match err {
            PredictError::Validation(_) => 2,
            PredictError::Unavailable => 3,
            PredictError::Model(_) => 4,
        };
        AppError::new(code, format!("{err}\n{}", err.hint()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Column, ValidationError};
    use crate::models::ModelError;

    #[test]
    fn exit_codes_follow_error_kind() {
        let validation = PredictError::Validation(ValidationError::NotFinite {
            field: Column::Balance,
        });
        assert_eq!(AppError::from(validation).exit_code(), 2);

        let model = PredictError::Model(ModelError::TypeMismatch(Column::Job));
        let app = AppError::from(model);
        assert_eq!(app.exit_code(), 4);
        assert!(app.to_string().contains("matching feature columns"));

        let load = LoadError::Missing {
            path: "bestmodel.mdl".into(),
        };
        assert_eq!(AppError::from(&load).exit_code(), 3);
    }
}
