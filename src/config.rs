//! Runtime configuration.
//!
//! Settings are layered: built-in defaults, then `.env` / process environment,
//! then command-line flags. Feature bounds can be overridden by a TOML file:
//!
//! ```toml
//! [balance]
//! min = -5000.0
//! max = 20000.0
//! step = 50.0
//!
//! [pdays]
//! max = 999
//! ```
//!
//! Every table and key is optional.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{FeatureBounds, FloatRange, IntRange};
use crate::models::DEFAULT_MODEL_PATH;

pub const ENV_MODEL_PATH: &str = "DEPOSIT_MODEL_PATH";
pub const ENV_BOUNDS: &str = "DEPOSIT_BOUNDS";
pub const ENV_LOG: &str = "DEPOSIT_LOG";
pub const ENV_LOG_FILE: &str = "DEPOSIT_LOG_FILE";

pub const DEFAULT_LOG_FILTER: &str = "deposit_scorer=info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid bounds configuration: {0}")]
    Invalid(String),
}

/// Flag values that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub model: Option<PathBuf>,
    pub bounds: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub model_path: PathBuf,
    pub bounds: FeatureBounds,
    pub log_filter: String,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Load `.env` (if present) and resolve against the process environment.
    pub fn load(overrides: &Overrides) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve settings using `env` as the variable source.
    pub fn resolve(overrides: &Overrides, env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let model_path = overrides
            .model
            .clone()
            .or_else(|| non_empty(ENV_MODEL_PATH).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));

        let bounds_path = overrides
            .bounds
            .clone()
            .or_else(|| non_empty(ENV_BOUNDS).map(PathBuf::from));
        let bounds = match bounds_path {
            Some(path) => load_bounds(&path)?,
            None => FeatureBounds::default(),
        };

        let log_filter = non_empty(ENV_LOG).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let log_file = overrides
            .log_file
            .clone()
            .or_else(|| non_empty(ENV_LOG_FILE).map(PathBuf::from));

        Ok(Self {
            model_path,
            bounds,
            log_filter,
            log_file,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct IntOverride {
    min: Option<i32>,
    max: Option<i32>,
    step: Option<i32>,
}

impl IntOverride {
    fn apply(self, base: IntRange) -> IntRange {
        IntRange {
            min: self.min.unwrap_or(base.min),
            max: self.max.unwrap_or(base.max),
            step: self.step.unwrap_or(base.step),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FloatOverride {
    min: Option<f64>,
    max: Option<f64>,
    step: Option<f64>,
}

impl FloatOverride {
    fn apply(self, base: FloatRange) -> FloatRange {
        FloatRange {
            min: self.min.unwrap_or(base.min),
            max: self.max.unwrap_or(base.max),
            step: self.step.unwrap_or(base.step),
        }
    }
}

/// Partial bounds as written in a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoundsFile {
    #[serde(default)]
    age: IntOverride,
    #[serde(default)]
    balance: FloatOverride,
    #[serde(default)]
    campaign: IntOverride,
    #[serde(default)]
    pdays: IntOverride,
}

impl BoundsFile {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Overlay onto `base` and check the result.
    pub fn apply(&self, base: FeatureBounds) -> Result<FeatureBounds, ConfigError> {
        let bounds = FeatureBounds {
            age: self.age.apply(base.age),
            balance: self.balance.apply(base.balance),
            campaign: self.campaign.apply(base.campaign),
            pdays: self.pdays.apply(base.pdays),
        };
        bounds.check().map_err(ConfigError::Invalid)?;
        Ok(bounds)
    }
}

/// Load a bounds file and overlay it onto the defaults.
pub fn load_bounds(path: &Path) -> Result<FeatureBounds, ConfigError> {
    let bounds = BoundsFile::from_toml_file(path)?.apply(FeatureBounds::default())?;
    tracing::info!(path = %path.display(), ?bounds, "loaded feature bounds");
    Ok(bounds)
}
