//! Scores records against the bundled `bestmodel.mdl`.

use std::path::PathBuf;

use deposit_scorer::app::pipeline::{self, Session};
use deposit_scorer::config::{Overrides, Settings};
use deposit_scorer::domain::{FeatureBounds, FeatureFields, Label, Month, RawInputs};
use deposit_scorer::models::{LoadError, ModelGateway, PredictError};
use deposit_scorer::report::{Banner, PriorityTier};

fn bundled_model() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("bestmodel.mdl")
}

fn session() -> Session {
    let settings = Settings::resolve(
        &Overrides {
            model: Some(bundled_model()),
            ..Overrides::default()
        },
        |_| None,
    )
    .unwrap();
    Session::start(&settings)
}

#[test]
fn bundled_model_matches_the_form_schema() {
    let session = session();
    let model = session.gateway.model().unwrap();
    assert!(model.check_schema().is_ok());
    assert_eq!(model.kind_name(), "gbdt");
    assert_eq!(model.tree_count(), 8);
}

#[test]
fn default_record_is_a_medium_priority_yes() {
    let scored = pipeline::score_fields(&session(), FeatureFields::default()).unwrap();
    let p = scored.prediction.probabilities;
    assert!((p.p_no + p.p_yes - 1.0).abs() < 1e-9);

    // base -1.5 plus leaves 1.8 gives a margin of 0.3
    assert!((scored.prediction.margin - 0.3).abs() < 1e-9);
    assert_eq!(scored.prediction.label, Label::Yes);
    assert_eq!(scored.outcome.banner, Banner::WillSubscribe);
    assert_eq!(scored.outcome.p_yes_pct, 57.4);
    assert_eq!(scored.outcome.p_no_pct, 42.6);
    assert_eq!(scored.outcome.tier, PriorityTier::Medium);
    assert!((scored.outcome.progress - p.p_yes).abs() < 1e-12);
}

#[test]
fn never_contacted_customer_is_low_priority() {
    let fields = FeatureFields {
        pdays: -1,
        ..FeatureFields::default()
    };
    let scored = pipeline::score_fields(&session(), fields).unwrap();
    assert_eq!(scored.outcome.banner, Banner::WillNotSubscribe);
    assert_eq!(scored.outcome.tier, PriorityTier::Low);
}

#[test]
fn recently_contacted_retiree_in_march_is_high_priority() {
    let raw = RawInputs {
        job: "retired".to_string(),
        month: "mar".to_string(),
        ..RawInputs::default()
    };
    let scored = pipeline::score_raw(&session(), &raw).unwrap();
    assert_eq!(scored.record.fields().month, Month::Mar);
    assert_eq!(scored.outcome.tier, PriorityTier::High);
    assert!(scored.outcome.p_yes_pct >= 70.0);
}

#[test]
fn unknown_category_is_a_validation_error() {
    let raw = RawInputs {
        job: "astronaut".to_string(),
        ..RawInputs::default()
    };
    let err = pipeline::score_raw(&session(), &raw).unwrap_err();
    assert!(matches!(err, PredictError::Validation(_)));
}

#[test]
fn missing_artifact_disables_prediction() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session {
        gateway: ModelGateway::open(dir.path().join("bestmodel.mdl")),
        bounds: FeatureBounds::default(),
    };
    assert!(matches!(session.gateway.load_error(), Some(LoadError::Missing { .. })));
    assert!(matches!(
        pipeline::score_fields(&session, FeatureFields::default()),
        Err(PredictError::Unavailable)
    ));
}
