//! Model gateway: owns the classifier for the lifetime of the process.
//!
//! The gateway is created once by application startup and handed to the
//! front-end. Loading happens inside `ModelGateway::open` and is never
//! repeated; a failed load leaves the gateway in a disabled state instead of
//! aborting the process.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::{FeatureRecord, Prediction};
use crate::models::artifact::ModelArtifact;
use crate::models::error::{LoadError, PredictError};
use crate::models::model::Model;

pub const DEFAULT_MODEL_PATH: &str = "bestmodel.mdl";

#[derive(Debug)]
pub struct ModelGateway {
    path: PathBuf,
    state: Result<Model, LoadError>,
}

impl ModelGateway {
    /// Load the artifact at `path`. Never fails; check `load_error()`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = load_model(&path);
        match &state {
            Ok(model) => {
                tracing::info!(
                    path = %path.display(),
                    name = model.name(),
                    kind = model.kind_name(),
                    trees = model.tree_count(),
                    "model loaded"
                );
                if let Err(err) = model.check_schema() {
                    tracing::warn!(%err, "model schema does not match the feature record");
                }
            }
            Err(err) => tracing::warn!(%err, "model unavailable"),
        }
        Self { path, state }
    }

    /// Wrap an already compiled model.
    pub fn with_model(path: impl Into<PathBuf>, model: Model) -> Self {
        Self {
            path: path.into(),
            state: Ok(model),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn model(&self) -> Result<&Model, &LoadError> {
        self.state.as_ref()
    }

    pub fn load_error(&self) -> Option<&LoadError> {
        self.state.as_ref().err()
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ok()
    }

    /// Score one validated record.
    pub fn predict(&self, record: &FeatureRecord) -> Result<Prediction, PredictError> {
        let model = self.state.as_ref().map_err(|_| PredictError::Unavailable)?;
        Ok(model.predict(record)?)
    }
}

/// Read, parse and validate a model artifact.
pub fn load_model(path: &Path) -> Result<Model, LoadError> {
    if path.is_dir() {
        return Err(LoadError::Corrupt {
            path: path.to_path_buf(),
            reason: "expected a file, got a directory".to_string(),
        });
    }

    let bytes = fs::read(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            LoadError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Unreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let artifact: ModelArtifact = serde_json::from_slice(&bytes).map_err(|e| LoadError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Model::from_artifact(artifact).map_err(|reason| LoadError::Corrupt {
        path: path.to_path_buf(),
        reason,
    })
}
