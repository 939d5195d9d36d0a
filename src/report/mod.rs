//! Rendering of a prediction into presentation values.
//!
//! `render` is the single mapping from model output to what the user sees:
//! the decision banner, the two probability metrics, the progress ratio and
//! the priority tier. Front-ends only lay these out.

use serde::{Deserialize, Serialize};

use crate::domain::{Label, Prediction};

pub mod format;

pub use format::*;

/// Lower bound (percentage points) of the high-priority band.
pub const HIGH_PRIORITY_PCT: f64 = 70.0;
/// Lower bound (percentage points) of the medium-priority band.
pub const MEDIUM_PRIORITY_PCT: f64 = 50.0;

/// Decision banner, chosen from the label alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Banner {
    WillSubscribe,
    WillNotSubscribe,
}

impl Banner {
    pub fn for_label(label: Label) -> Self {
        match label {
            Label::Yes => Banner::WillSubscribe,
            Label::No => Banner::WillNotSubscribe,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Banner::WillSubscribe => "WILL OPEN A DEPOSIT",
            Banner::WillNotSubscribe => "WILL NOT OPEN A DEPOSIT",
        }
    }

    pub fn is_positive(self) -> bool {
        matches!(self, Banner::WillSubscribe)
    }
}

/// Outreach priority derived from `p_yes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    High,
    Medium,
    Low,
}

impl PriorityTier {
    /// Bands are closed on their lower end: 70.0 is high, 50.0 is medium.
    pub fn from_percent(p_yes_pct: f64) -> Self {
        if p_yes_pct >= HIGH_PRIORITY_PCT {
            PriorityTier::High
        } else if p_yes_pct >= MEDIUM_PRIORITY_PCT {
            PriorityTier::Medium
        } else {
            PriorityTier::Low
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PriorityTier::High => "High priority",
            PriorityTier::Medium => "Medium priority",
            PriorityTier::Low => "Low priority",
        }
    }

    pub fn interpretation(self) -> &'static str {
        match self {
            PriorityTier::High => "This customer is very likely to open a deposit!",
            PriorityTier::Medium => "This customer has fair potential; the right approach is needed.",
            PriorityTier::Low => "This customer is unlikely to open a deposit.",
        }
    }
}

/// Everything the results panel shows for one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub label: Label,
    pub banner: Banner,
    /// `p_no × 100`, rounded to one decimal.
    pub p_no_pct: f64,
    /// `p_yes × 100`, rounded to one decimal.
    pub p_yes_pct: f64,
    /// Progress indicator fill in `[0, 1]`.
    pub progress: f64,
    pub tier: PriorityTier,
}

/// Map a prediction to its presentation.
///
/// The tier is decided on the unrounded percentage.
pub fn render(prediction: &Prediction) -> Outcome {
    let p = prediction.probabilities;
    let p_yes_pct = p.p_yes * 100.0;
    Outcome {
        label: prediction.label,
        banner: Banner::for_label(prediction.label),
        p_no_pct: round1(p.p_no * 100.0),
        p_yes_pct: round1(p_yes_pct),
        progress: p.p_yes.clamp(0.0, 1.0),
        tier: PriorityTier::from_percent(p_yes_pct),
    }
}

/// Round to one decimal exactly as `{:.1}` prints it, so the stored value and
/// the displayed text never disagree.
pub fn round1(v: f64) -> f64 {
    format!("{v:.1}").parse().unwrap_or(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Probabilities;

    fn prediction(label: Label, p_yes: f64) -> Prediction {
        Prediction {
            label,
            probabilities: Probabilities::from_positive(p_yes),
            margin: 0.0,
        }
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(PriorityTier::from_percent(70.0), PriorityTier::High);
        assert_eq!(PriorityTier::from_percent(69.9), PriorityTier::Medium);
        assert_eq!(PriorityTier::from_percent(50.0), PriorityTier::Medium);
        assert_eq!(PriorityTier::from_percent(49.9), PriorityTier::Low);
        assert_eq!(PriorityTier::from_percent(100.0), PriorityTier::High);
        assert_eq!(PriorityTier::from_percent(0.0), PriorityTier::Low);
    }

    #[test]
    fn tier_matches_band_definition_across_range() {
        for i in 0..=1000 {
            let pct = i as f64 / 10.0;
            let tier = PriorityTier::from_percent(pct);
            assert_eq!(tier == PriorityTier::High, pct >= 70.0);
            assert_eq!(tier == PriorityTier::Medium, (50.0..70.0).contains(&pct));
            assert_eq!(tier == PriorityTier::Low, pct < 50.0);
        }
    }

    #[test]
    fn banner_depends_on_label_only() {
        for p in [0.0, 0.3, 0.5, 0.9, 1.0] {
            assert_eq!(render(&prediction(Label::Yes, p)).banner, Banner::WillSubscribe);
            assert_eq!(render(&prediction(Label::No, p)).banner, Banner::WillNotSubscribe);
        }
    }

    #[test]
    fn percentages_are_rounded_to_one_decimal() {
        let outcome = render(&prediction(Label::No, 0.1234));
        assert_eq!(outcome.p_yes_pct, 12.3);
        assert_eq!(outcome.p_no_pct, 87.7);
        assert!((outcome.progress - 0.1234).abs() < 1e-12);
        assert_eq!(outcome.tier, PriorityTier::Low);
    }

    #[test]
    fn rounding_matches_printed_text() {
        // 0.35 is stored just below the half, so it prints as 0.3
        assert_eq!(round1(0.35), 0.3);
        assert_eq!(round1(12.34), 12.3);

        for i in 0..=2000 {
            let p = i as f64 / 2000.0;
            let outcome = render(&prediction(Label::No, p));
            assert_eq!(
                format!("{:.1}", outcome.p_yes_pct),
                format!("{:.1}", p * 100.0)
            );
        }
    }

    #[test]
    fn tier_uses_unrounded_percentage() {
        // 69.96% displays as 70.0 but is still below the high band.
        let outcome = render(&prediction(Label::Yes, 0.6996));
        assert_eq!(outcome.p_yes_pct, 70.0);
        assert_eq!(outcome.tier, PriorityTier::Medium);
    }
}
