//! Feature record assembly and validation.
//!
//! A `FeatureRecord` can only be obtained through validation, so anything the
//! gateway receives is already inside the configured domain.

use serde::Serialize;
use thiserror::Error;

use crate::domain::{
    Category, Column, Contact, FeatureBounds, FeatureFields, FeatureValue, Job, Month, RawInputs,
    YesNo,
};

/// A caller-side input problem. Fixing the input fixes the error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} = {value} is outside the allowed range [{min}, {max}]")]
    OutOfRange {
        field: Column,
        value: String,
        min: String,
        max: String,
    },

    #[error("{field} = '{value}' is not a known category (expected one of: {allowed})")]
    UnknownCategory {
        field: Column,
        value: String,
        allowed: String,
    },

    #[error("{field} must be a finite number")]
    NotFinite { field: Column },
}

/// One validated, immutable row of model input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureRecord {
    fields: FeatureFields,
}

impl FeatureRecord {
    /// Validate typed fields against `bounds`.
    pub fn new(fields: FeatureFields, bounds: &FeatureBounds) -> Result<Self, ValidationError> {
        check_int(Column::Age, fields.age.into(), bounds.age.min, bounds.age.max)?;
        if !fields.balance.is_finite() {
            return Err(ValidationError::NotFinite {
                field: Column::Balance,
            });
        }
        if !bounds.balance.contains(fields.balance) {
            return Err(ValidationError::OutOfRange {
                field: Column::Balance,
                value: fields.balance.to_string(),
                min: bounds.balance.min.to_string(),
                max: bounds.balance.max.to_string(),
            });
        }
        check_int(
            Column::Campaign,
            fields.campaign.into(),
            bounds.campaign.min,
            bounds.campaign.max,
        )?;
        check_int(Column::Pdays, fields.pdays.into(), bounds.pdays.min, bounds.pdays.max)?;
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &FeatureFields {
        &self.fields
    }

    /// Value of one column, in the representation the model consumes.
    pub fn value(&self, column: Column) -> FeatureValue {
        let f = &self.fields;
        match column {
            Column::Age => FeatureValue::Numeric(f.age.into()),
            Column::Job => FeatureValue::Categorical(f.job.as_str()),
            Column::Housing => FeatureValue::Categorical(f.housing.as_str()),
            Column::Loan => FeatureValue::Categorical(f.loan.as_str()),
            Column::Contact => FeatureValue::Categorical(f.contact.as_str()),
            Column::Month => FeatureValue::Categorical(f.month.as_str()),
            Column::Balance => FeatureValue::Numeric(f.balance),
            Column::Campaign => FeatureValue::Numeric(f.campaign.into()),
            Column::Pdays => FeatureValue::Numeric(f.pdays.into()),
        }
    }
}

/// Map raw scalar inputs into the ordered feature schema.
///
/// Only type coercion happens here: strings become categories, integers are
/// range-checked before narrowing. No normalization.
pub fn assemble(raw: &RawInputs, bounds: &FeatureBounds) -> Result<FeatureRecord, ValidationError> {
    let fields = FeatureFields {
        age: narrow(Column::Age, raw.age, bounds.age.min, bounds.age.max)?,
        job: parse_category::<Job>(Column::Job, &raw.job)?,
        housing: parse_category::<YesNo>(Column::Housing, &raw.housing)?,
        loan: parse_category::<YesNo>(Column::Loan, &raw.loan)?,
        contact: parse_category::<Contact>(Column::Contact, &raw.contact)?,
        month: parse_category::<Month>(Column::Month, &raw.month)?,
        balance: raw.balance,
        campaign: narrow(Column::Campaign, raw.campaign, bounds.campaign.min, bounds.campaign.max)?,
        pdays: narrow(Column::Pdays, raw.pdays, bounds.pdays.min, bounds.pdays.max)?,
    };
    tracing::debug!(?fields, "assembled feature record");
    FeatureRecord::new(fields, bounds)
}

fn parse_category<C: Category>(field: Column, value: &str) -> Result<C, ValidationError> {
    C::parse(value).ok_or_else(|| ValidationError::UnknownCategory {
        field,
        value: value.to_string(),
        allowed: C::allowed(),
    })
}

fn narrow(field: Column, value: i64, min: i32, max: i32) -> Result<i32, ValidationError> {
    check_int(field, value, min, max)?;
    Ok(value as i32)
}

fn check_int(field: Column, value: i64, min: i32, max: i32) -> Result<(), ValidationError> {
    if value < i64::from(min) || value > i64::from(max) {
        return Err(ValidationError::OutOfRange {
            field,
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}
