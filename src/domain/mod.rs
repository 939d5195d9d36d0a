//! Domain types used throughout the scoring flow.
//!
//! This module defines:
//!
//! - closed categorical enums (`Job`, `YesNo`, `Contact`, `Month`)
//! - the feature schema (`Column`) and validated row (`FeatureRecord`)
//! - numeric bounds (`FeatureBounds`)
//! - model outputs (`Label`, `Probabilities`, `Prediction`)

pub mod bounds;
pub mod record;
pub mod types;

pub use bounds::*;
pub use record::*;
pub use types::*;
