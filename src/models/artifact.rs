//! On-disk model artifact schema.
//!
//! The artifact is a JSON document produced by the training pipeline. It
//! names the input columns, the trained vocabulary of each categorical column,
//! and the scorer itself (a boosted tree ensemble or a logistic model).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const ARTIFACT_FORMAT: &str = "deposit-model";
pub const ARTIFACT_VERSION: u32 = 1;

fn default_threshold() -> f64 {
    0.5
}

fn default_name() -> String {
    "binary classifier".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format: String,
    pub version: u32,
    #[serde(default = "default_name")]
    pub name: String,
    /// Input columns in the order the scorer indexes them.
    pub features: Vec<String>,
    /// Trained vocabulary per categorical column; a value is encoded as its index.
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<String>>,
    /// Decision threshold on `p_yes`.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    pub model: ScorerSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScorerSpec {
    Gbdt(GbdtSpec),
    Logistic(LogisticSpec),
}

/// Gradient-boosted tree ensemble for binary classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbdtSpec {
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<TreeSpec>,
}

/// A flat node array; node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSpec {
    pub nodes: Vec<NodeSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeSpec {
    /// Go left when `x[feature] <= threshold`.
    Numeric {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Go left when the encoded category of `x[feature]` is in `left_categories`.
    Categorical {
        feature: usize,
        left_categories: Vec<usize>,
        left: usize,
        right: usize,
    },
    Leaf(f64),
}

/// Logistic regression with one-hot categorical inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticSpec {
    #[serde(default)]
    pub intercept: f64,
    /// One entry per feature, aligned with `ModelArtifact::features`.
    pub weights: Vec<FeatureWeight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureWeight {
    Scalar(f64),
    OneHot(Vec<f64>),
}
