//! Classifier artifact loading and evaluation.
//!
//! - artifact JSON schema (`artifact`)
//! - compiled model + scoring (`model`)
//! - process-lifetime gateway (`gateway`)

pub mod artifact;
pub mod error;
pub mod gateway;
pub mod model;

pub use error::*;
pub use gateway::*;
pub use model::{Model, sigmoid};
