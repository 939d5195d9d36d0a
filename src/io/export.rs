//! Export a scored record to JSON.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: the inputs, the raw probabilities and the rendered outcome.

use std::fs::{File, create_dir_all};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::domain::{FeatureFields, Label};
use crate::error::AppError;
use crate::report::{Banner, Outcome, PriorityTier};

/// Directory used by the TUI for timestamped exports.
pub const EXPORT_DIR: &str = "exports";

#[derive(Debug, Clone, Serialize)]
pub struct OutcomeFile {
    pub tool: String,
    pub generated: String,
    pub model: String,
    pub features: FeatureFields,
    pub label: Label,
    /// Class index of `label` (0 = no, 1 = yes).
    pub class: u8,
    pub p_no: f64,
    pub p_yes: f64,
    pub p_no_pct: f64,
    pub p_yes_pct: f64,
    pub banner: Banner,
    pub tier: PriorityTier,
}

impl OutcomeFile {
    pub fn new(
        model: &str,
        features: &FeatureFields,
        p_no: f64,
        p_yes: f64,
        outcome: &Outcome,
        generated: DateTime<Local>,
    ) -> Self {
        Self {
            tool: "deposit".to_string(),
            generated: generated.to_rfc3339(),
            model: model.to_string(),
            features: features.clone(),
            label: outcome.label,
            class: outcome.label.as_index(),
            p_no,
            p_yes,
            p_no_pct: outcome.p_no_pct,
            p_yes_pct: outcome.p_yes_pct,
            banner: outcome.banner,
            tier: outcome.tier,
        }
    }
}

/// Write an outcome JSON file.
pub fn write_outcome_json(path: &Path, file: &OutcomeFile) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)
            .map_err(|e| AppError::new(5, format!("Failed to create export dir '{}': {e}", parent.display())))?;
    }
    let out = File::create(path)
        .map_err(|e| AppError::new(5, format!("Failed to create export JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(out, file)
        .map_err(|e| AppError::new(5, format!("Failed to write export JSON: {e}")))?;
    Ok(())
}

/// `exports/deposit_<YYYYmmdd_HHMMSS>.json` under `root`.
pub fn timestamped_export_path(root: &Path, now: DateTime<Local>) -> PathBuf {
    root.join(EXPORT_DIR)
        .join(format!("deposit_{}.json", now.format("%Y%m%d_%H%M%S")))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::{Prediction, Probabilities};
    use crate::report::render;

    fn sample_file() -> OutcomeFile {
        let prediction = Prediction {
            label: Label::No,
            probabilities: Probabilities::from_positive(0.42),
            margin: -0.3,
        };
        let outcome = render(&prediction);
        let now = Local.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        OutcomeFile::new("test", &FeatureFields::default(), 0.58, 0.42, &outcome, now)
    }

    #[test]
    fn export_writes_readable_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        write_outcome_json(&path, &sample_file()).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let back: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(back["tier"], "low");
        assert_eq!(back["label"], "no");
        assert_eq!(back["class"], 0);
        assert_eq!(back["features"]["job"], "admin.");
        assert_eq!(back["p_yes_pct"], 42.0);
    }

    #[test]
    fn timestamped_path_layout() {
        let now = Local.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        let path = timestamped_export_path(Path::new("."), now);
        assert_eq!(path, Path::new("./exports/deposit_20250304_050607.json"));
    }
}
