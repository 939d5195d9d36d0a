//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - edited in the terminal form
//! - passed to the scoring model
//! - exported to JSON alongside the prediction

use std::fmt;

use serde::{Deserialize, Serialize};

/// A closed set of categorical values, as offered by the form selectors.
///
/// `ALL` is the display order; `as_str` is the exact string the model was
/// trained with.
pub trait Category: Copy + PartialEq + Sized + 'static {
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.iter().copied().find(|c| c.as_str() == value)
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|&c| c == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.index() + len - 1) % len]
    }

    /// Comma-separated list of accepted values (for error messages).
    fn allowed() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Customer occupation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Job {
    #[default]
    #[serde(rename = "admin.")]
    Admin,
    #[serde(rename = "self-employed")]
    SelfEmployed,
    #[serde(rename = "services")]
    Services,
    #[serde(rename = "housemaid")]
    Housemaid,
    #[serde(rename = "technician")]
    Technician,
    #[serde(rename = "management")]
    Management,
    #[serde(rename = "student")]
    Student,
    #[serde(rename = "blue-collar")]
    BlueCollar,
    #[serde(rename = "entrepreneur")]
    Entrepreneur,
    #[serde(rename = "retired")]
    Retired,
    #[serde(rename = "unemployed")]
    Unemployed,
}

impl Category for Job {
    const ALL: &'static [Self] = &[
        Job::Admin,
        Job::SelfEmployed,
        Job::Services,
        Job::Housemaid,
        Job::Technician,
        Job::Management,
        Job::Student,
        Job::BlueCollar,
        Job::Entrepreneur,
        Job::Retired,
        Job::Unemployed,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Job::Admin => "admin.",
            Job::SelfEmployed => "self-employed",
            Job::Services => "services",
            Job::Housemaid => "housemaid",
            Job::Technician => "technician",
            Job::Management => "management",
            Job::Student => "student",
            Job::BlueCollar => "blue-collar",
            Job::Entrepreneur => "entrepreneur",
            Job::Retired => "retired",
            Job::Unemployed => "unemployed",
        }
    }
}

/// Yes/no flag used for the housing and personal loan columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    #[default]
    No,
    Yes,
}

impl Category for YesNo {
    const ALL: &'static [Self] = &[YesNo::No, YesNo::Yes];

    fn as_str(self) -> &'static str {
        match self {
            YesNo::No => "no",
            YesNo::Yes => "yes",
        }
    }
}

/// Communication channel used for the last contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Contact {
    #[default]
    Cellular,
    Telephone,
}

impl Category for Contact {
    const ALL: &'static [Self] = &[Contact::Cellular, Contact::Telephone];

    fn as_str(self) -> &'static str {
        match self {
            Contact::Cellular => "cellular",
            Contact::Telephone => "telephone",
        }
    }
}

/// Month of the last contact (three-letter code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    #[default]
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Category for Month {
    const ALL: &'static [Self] = &[
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Month::Jan => "jan",
            Month::Feb => "feb",
            Month::Mar => "mar",
            Month::Apr => "apr",
            Month::May => "may",
            Month::Jun => "jun",
            Month::Jul => "jul",
            Month::Aug => "aug",
            Month::Sep => "sep",
            Month::Oct => "oct",
            Month::Nov => "nov",
            Month::Dec => "dec",
        }
    }
}

macro_rules! display_category {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_category!(Job, YesNo, Contact, Month);

/// The model's input columns, in schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Age,
    Job,
    Housing,
    Loan,
    Contact,
    Month,
    Balance,
    Campaign,
    Pdays,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::Age,
        Column::Job,
        Column::Housing,
        Column::Loan,
        Column::Contact,
        Column::Month,
        Column::Balance,
        Column::Campaign,
        Column::Pdays,
    ];

    /// Column name as it appears in the model artifact.
    pub fn name(self) -> &'static str {
        match self {
            Column::Age => "age",
            Column::Job => "job",
            Column::Housing => "housing",
            Column::Loan => "loan",
            Column::Contact => "contact",
            Column::Month => "month",
            Column::Balance => "balance",
            Column::Campaign => "campaign",
            Column::Pdays => "pdays",
        }
    }

    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.iter().copied().find(|c| c.name() == name)
    }

    pub fn is_categorical(self) -> bool {
        matches!(
            self,
            Column::Job | Column::Housing | Column::Loan | Column::Contact | Column::Month
        )
    }

    /// One-line description shown in the model information panel.
    pub fn description(self) -> &'static str {
        match self {
            Column::Age => "customer age",
            Column::Job => "type of job",
            Column::Housing => "has a housing loan",
            Column::Loan => "has a personal loan",
            Column::Contact => "contact communication type",
            Column::Month => "month of the last contact",
            Column::Balance => "average yearly account balance (EUR)",
            Column::Campaign => "contacts performed during this campaign",
            Column::Pdays => "days since last contact in a previous campaign",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single column value as seen by the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Numeric(f64),
    Categorical(&'static str),
}

/// Typed, not-yet-validated feature values (what the form edits).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureFields {
    pub age: i32,
    pub job: Job,
    pub housing: YesNo,
    pub loan: YesNo,
    pub contact: Contact,
    pub month: Month,
    pub balance: f64,
    pub campaign: i32,
    pub pdays: i32,
}

impl Default for FeatureFields {
    fn default() -> Self {
        Self {
            age: 41,
            job: Job::Admin,
            housing: YesNo::No,
            loan: YesNo::No,
            contact: Contact::Cellular,
            month: Month::Jan,
            balance: 1457.0,
            campaign: 3,
            pdays: 48,
        }
    }
}

/// Raw scalar inputs as they come from a caller that is not the form
/// (CLI flags, JSON). Categorical values are still strings here.
#[derive(Debug, Clone, PartialEq)]
pub struct RawInputs {
    pub age: i64,
    pub job: String,
    pub housing: String,
    pub loan: String,
    pub contact: String,
    pub month: String,
    pub balance: f64,
    pub campaign: i64,
    pub pdays: i64,
}

impl Default for RawInputs {
    fn default() -> Self {
        let d = FeatureFields::default();
        Self {
            age: d.age.into(),
            job: d.job.as_str().to_string(),
            housing: d.housing.as_str().to_string(),
            loan: d.loan.as_str().to_string(),
            contact: d.contact.as_str().to_string(),
            month: d.month.as_str().to_string(),
            balance: d.balance,
            campaign: d.campaign.into(),
            pdays: d.pdays.into(),
        }
    }
}

/// Predicted class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    No,
    Yes,
}

impl Label {
    /// Numeric class index (0 = no, 1 = yes).
    pub fn as_index(self) -> u8 {
        match self {
            Label::No => 0,
            Label::Yes => 1,
        }
    }
}

/// Class probabilities `(p_no, p_yes)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probabilities {
    pub p_no: f64,
    pub p_yes: f64,
}

impl Probabilities {
    /// Build the vector from the positive-class probability.
    ///
    /// `p_yes` is clamped to `[0, 1]`; `p_no` is its complement, so the pair
    /// always sums to 1.
    pub fn from_positive(p_yes: f64) -> Self {
        let p_yes = p_yes.clamp(0.0, 1.0);
        Self {
            p_no: 1.0 - p_yes,
            p_yes,
        }
    }
}

/// Model output for one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: Label,
    pub probabilities: Probabilities,
    /// Raw model score before the logistic link.
    pub margin: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_sets_have_expected_sizes() {
        assert_eq!(Job::ALL.len(), 11);
        assert_eq!(Month::ALL.len(), 12);
        assert_eq!(YesNo::ALL.len(), 2);
        assert_eq!(Contact::ALL.len(), 2);
    }

    #[test]
    fn parse_uses_trained_spelling() {
        assert_eq!(Job::parse("admin."), Some(Job::Admin));
        assert_eq!(Job::parse("blue-collar"), Some(Job::BlueCollar));
        assert_eq!(Job::parse("admin"), None);
        assert_eq!(Month::parse(" dec "), Some(Month::Dec));
        assert_eq!(Contact::parse("email"), None);
    }

    #[test]
    fn next_and_prev_wrap_around() {
        assert_eq!(Month::Dec.next(), Month::Jan);
        assert_eq!(Month::Jan.prev(), Month::Dec);
        assert_eq!(YesNo::No.next(), YesNo::Yes);
        assert_eq!(Job::Admin.prev(), Job::Unemployed);
    }

    #[test]
    fn serde_matches_model_strings() {
        let json = serde_json::to_string(&Job::SelfEmployed).unwrap();
        assert_eq!(json, "\"self-employed\"");
        let month: Month = serde_json::from_str("\"may\"").unwrap();
        assert_eq!(month, Month::May);
    }

    #[test]
    fn column_names_round_trip() {
        for column in Column::ALL {
            assert_eq!(Column::from_name(column.name()), Some(column));
        }
        assert_eq!(Column::from_name("duration"), None);
    }

    #[test]
    fn probabilities_sum_to_one() {
        for p in [0.0, 0.123456789, 0.5, 0.7, 0.999, 1.0, 1.5, -0.2] {
            let probs = Probabilities::from_positive(p);
            assert!((probs.p_no + probs.p_yes - 1.0).abs() < 1e-6);
            assert!((0.0..=1.0).contains(&probs.p_yes));
        }
    }

    #[test]
    fn label_index_mapping() {
        assert_eq!(Label::No.as_index(), 0);
        assert_eq!(Label::Yes.as_index(), 1);
    }
}
