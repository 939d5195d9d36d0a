//! Shared scoring flow used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! assemble -> validate -> gateway predict -> render
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use chrono::{DateTime, Local};

use crate::config::Settings;
use crate::domain::{FeatureBounds, FeatureFields, FeatureRecord, Prediction, RawInputs, assemble};
use crate::io::OutcomeFile;
use crate::models::{ModelGateway, PredictError};
use crate::report::{Outcome, render};

/// State that lives for the whole process: the loaded gateway and the bounds
/// every record is validated against.
#[derive(Debug)]
pub struct Session {
    pub gateway: ModelGateway,
    pub bounds: FeatureBounds,
}

impl Session {
    /// Load the model once. A failed load yields a disabled session, not an error.
    pub fn start(settings: &Settings) -> Self {
        Self {
            gateway: ModelGateway::open(&settings.model_path),
            bounds: settings.bounds,
        }
    }

    pub fn model_name(&self) -> &str {
        self.gateway.model().map(|m| m.name()).unwrap_or("-")
    }
}

/// All computed outputs of one submit.
#[derive(Debug, Clone)]
pub struct Scored {
    pub record: FeatureRecord,
    pub prediction: Prediction,
    pub outcome: Outcome,
}

impl Scored {
    pub fn export_file(&self, model_name: &str, now: DateTime<Local>) -> OutcomeFile {
        OutcomeFile::new(
            model_name,
            self.record.fields(),
            self.prediction.probabilities.p_no,
            self.prediction.probabilities.p_yes,
            &self.outcome,
            now,
        )
    }
}

/// Score typed form values.
pub fn score_fields(session: &Session, fields: FeatureFields) -> Result<Scored, PredictError> {
    let record = FeatureRecord::new(fields, &session.bounds)?;
    score_record(session, record)
}

/// Score raw scalar inputs (CLI flags).
pub fn score_raw(session: &Session, raw: &RawInputs) -> Result<Scored, PredictError> {
    let record = assemble(raw, &session.bounds)?;
    score_record(session, record)
}

fn score_record(session: &Session, record: FeatureRecord) -> Result<Scored, PredictError> {
    let prediction = match session.gateway.predict(&record) {
        Ok(p) => p,
        Err(err) => {
            tracing::warn!(%err, "prediction failed");
            return Err(err);
        }
    };
    let outcome = render(&prediction);
    tracing::info!(
        label = ?outcome.label,
        p_yes = outcome.p_yes_pct,
        tier = ?outcome.tier,
        "prediction complete"
    );
    Ok(Scored {
        record,
        prediction,
        outcome,
    })
}
