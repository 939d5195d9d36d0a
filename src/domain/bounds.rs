//! Validation bounds for the numeric features.
//!
//! The defaults are the observed ranges of the training data. They are
//! configurable (see `config::BoundsFile`) rather than treated as physical
//! limits.

use serde::{Deserialize, Serialize};

use crate::domain::FeatureFields;

/// Inclusive integer range plus the form's step size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i32,
    pub max: i32,
    pub step: i32,
}

impl IntRange {
    pub const fn new(min: i32, max: i32, step: i32) -> Self {
        Self { min, max, step }
    }

    pub fn contains(&self, value: i64) -> bool {
        value >= i64::from(self.min) && value <= i64::from(self.max)
    }

    pub fn clamp(&self, value: i64) -> i32 {
        value.clamp(i64::from(self.min), i64::from(self.max)) as i32
    }

    /// Move `value` by `delta` steps, staying inside the range.
    pub fn step_by(&self, value: i32, delta: i32) -> i32 {
        let next = i64::from(value) + i64::from(delta) * i64::from(self.step.max(1));
        self.clamp(next)
    }
}

/// Inclusive floating-point range plus the form's step size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl FloatRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp into the range. Non-finite input maps to `min`.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    pub fn step_by(&self, value: f64, delta: i32) -> f64 {
        let step = if self.step > 0.0 { self.step } else { 1.0 };
        self.clamp(value + f64::from(delta) * step)
    }
}

/// Bounds for every numeric column of the feature record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureBounds {
    pub age: IntRange,
    pub balance: FloatRange,
    pub campaign: IntRange,
    pub pdays: IntRange,
}

pub const DEFAULT_AGE: IntRange = IntRange::new(18, 95, 1);
pub const DEFAULT_BALANCE: FloatRange = FloatRange::new(-6847.0, 29340.0, 100.0);
pub const DEFAULT_CAMPAIGN: IntRange = IntRange::new(1, 30, 1);
pub const DEFAULT_PDAYS: IntRange = IntRange::new(-1, 450, 1);

impl Default for FeatureBounds {
    fn default() -> Self {
        Self {
            age: DEFAULT_AGE,
            balance: DEFAULT_BALANCE,
            campaign: DEFAULT_CAMPAIGN,
            pdays: DEFAULT_PDAYS,
        }
    }
}

impl FeatureBounds {
    /// Check internal consistency: ordered, finite ranges with positive steps
    /// that still admit the form's default values.
    pub fn check(&self) -> Result<(), String> {
        check_int("age", &self.age)?;
        check_int("campaign", &self.campaign)?;
        check_int("pdays", &self.pdays)?;

        let b = &self.balance;
        if !(b.min.is_finite() && b.max.is_finite() && b.step.is_finite()) {
            return Err("balance bounds must be finite".to_string());
        }
        if b.min > b.max {
            return Err(format!("balance: min {} is greater than max {}", b.min, b.max));
        }
        if b.step <= 0.0 {
            return Err(format!("balance: step must be positive (got {})", b.step));
        }

        let d = FeatureFields::default();
        if !self.age.contains(d.age.into()) {
            return Err(format!("age: default {} lies outside [{}, {}]", d.age, self.age.min, self.age.max));
        }
        if !self.balance.contains(d.balance) {
            return Err(format!(
                "balance: default {} lies outside [{}, {}]",
                d.balance, self.balance.min, self.balance.max
            ));
        }
        if !self.campaign.contains(d.campaign.into()) {
            return Err(format!(
                "campaign: default {} lies outside [{}, {}]",
                d.campaign, self.campaign.min, self.campaign.max
            ));
        }
        if !self.pdays.contains(d.pdays.into()) {
            return Err(format!(
                "pdays: default {} lies outside [{}, {}]",
                d.pdays, self.pdays.min, self.pdays.max
            ));
        }
        Ok(())
    }
}

fn check_int(name: &str, range: &IntRange) -> Result<(), String> {
    if range.min > range.max {
        return Err(format!("{name}: min {} is greater than max {}", range.min, range.max));
    }
    if range.step <= 0 {
        return Err(format!("{name}: step must be positive (got {})", range.step));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_consistent() {
        assert_eq!(FeatureBounds::default().check(), Ok(()));
    }

    #[test]
    fn int_range_clamps_and_steps() {
        let r = IntRange::new(1, 30, 1);
        assert_eq!(r.clamp(0), 1);
        assert_eq!(r.clamp(99), 30);
        assert_eq!(r.step_by(30, 1), 30);
        assert_eq!(r.step_by(3, -1), 2);
        assert!(r.contains(1) && r.contains(30));
        assert!(!r.contains(31));
    }

    #[test]
    fn float_range_steps_by_configured_step() {
        let r = DEFAULT_BALANCE;
        assert_eq!(r.step_by(1457.0, 1), 1557.0);
        assert_eq!(r.step_by(29300.0, 1), 29340.0);
        assert_eq!(r.clamp(f64::NAN), r.min);
        assert_eq!(r.clamp(f64::NEG_INFINITY), r.min);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let bounds = FeatureBounds {
            campaign: IntRange::new(10, 5, 1),
            ..FeatureBounds::default()
        };
        let err = bounds.check().unwrap_err();
        assert!(err.contains("campaign"));
    }

    #[test]
    fn range_excluding_default_is_rejected() {
        let bounds = FeatureBounds {
            age: IntRange::new(50, 95, 1),
            ..FeatureBounds::default()
        };
        let err = bounds.check().unwrap_err();
        assert!(err.contains("default 41"));
    }
}
