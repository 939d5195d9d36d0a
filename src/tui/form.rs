//! Form state for the terminal UI.
//!
//! Numeric fields behave like clamped widgets: stepping and typed edits are
//! always pulled back into the configured bounds, so a submitted form never
//! fails validation.

use crate::domain::{Category, FeatureBounds, FeatureFields};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Age,
    Job,
    Housing,
    Loan,
    Contact,
    Month,
    Balance,
    Campaign,
    Pdays,
    Submit,
}

impl FormField {
    pub const ALL: [FormField; 10] = [
        FormField::Age,
        FormField::Job,
        FormField::Housing,
        FormField::Loan,
        FormField::Contact,
        FormField::Month,
        FormField::Balance,
        FormField::Campaign,
        FormField::Pdays,
        FormField::Submit,
    ];

    /// Fields of the "Demographics" column.
    pub const DEMOGRAPHICS: [FormField; 4] = [FormField::Age, FormField::Job, FormField::Housing, FormField::Loan];

    /// Fields of the "Campaign" column.
    pub const CAMPAIGN: [FormField; 5] = [
        FormField::Contact,
        FormField::Month,
        FormField::Balance,
        FormField::Campaign,
        FormField::Pdays,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Age => "Age",
            FormField::Job => "Job",
            FormField::Housing => "Housing loan",
            FormField::Loan => "Personal loan",
            FormField::Contact => "Contact method",
            FormField::Month => "Contact month",
            FormField::Balance => "Account balance",
            FormField::Campaign => "Campaign contacts",
            FormField::Pdays => "Days since contact",
            FormField::Submit => "Predict",
        }
    }

    /// Accepts typed input (Enter starts editing).
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            FormField::Age | FormField::Balance | FormField::Campaign | FormField::Pdays
        )
    }
}

#[derive(Debug, Clone)]
pub struct Form {
    pub fields: FeatureFields,
    bounds: FeatureBounds,
    selected: usize,
    editing: Option<String>,
}

impl Form {
    pub fn new(bounds: FeatureBounds) -> Self {
        Self {
            fields: FeatureFields::default(),
            bounds,
            selected: 0,
            editing: None,
        }
    }

    pub fn selected(&self) -> FormField {
        FormField::ALL[self.selected]
    }

    pub fn select(&mut self, field: FormField) {
        if let Some(idx) = FormField::ALL.iter().position(|&f| f == field) {
            self.selected = idx;
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < FormField::ALL.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.fields = FeatureFields::default();
        self.editing = None;
    }

    /// Step the selected field: numbers move by their step, selectors cycle.
    pub fn adjust(&mut self, delta: i32) {
        let b = self.bounds;
        let field = self.selected();
        let f = &mut self.fields;
        let forward = delta >= 0;
        match field {
            FormField::Age => f.age = b.age.step_by(f.age, delta),
            FormField::Job => f.job = if forward { f.job.next() } else { f.job.prev() },
            FormField::Housing => f.housing = if forward { f.housing.next() } else { f.housing.prev() },
            FormField::Loan => f.loan = if forward { f.loan.next() } else { f.loan.prev() },
            FormField::Contact => f.contact = if forward { f.contact.next() } else { f.contact.prev() },
            FormField::Month => f.month = if forward { f.month.next() } else { f.month.prev() },
            FormField::Balance => f.balance = b.balance.step_by(f.balance, delta),
            FormField::Campaign => f.campaign = b.campaign.step_by(f.campaign, delta),
            FormField::Pdays => f.pdays = b.pdays.step_by(f.pdays, delta),
            FormField::Submit => {}
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn edit_buffer(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    /// Start typing into the selected numeric field. Returns false otherwise.
    pub fn begin_edit(&mut self) -> bool {
        if !self.selected().is_numeric() {
            return false;
        }
        self.editing = Some(String::new());
        true
    }

    pub fn edit_push(&mut self, c: char) {
        let allow_dot = self.selected() == FormField::Balance;
        if let Some(buf) = &mut self.editing {
            if c.is_ascii_digit() || (c == '-' && buf.is_empty()) || (c == '.' && allow_dot && !buf.contains('.')) {
                buf.push(c);
            }
        }
    }

    pub fn edit_backspace(&mut self) {
        if let Some(buf) = &mut self.editing {
            buf.pop();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Apply the typed value, clamped into bounds. An empty buffer keeps the
    /// current value.
    pub fn commit_edit(&mut self) -> Result<(), String> {
        let Some(buf) = self.editing.take() else {
            return Ok(());
        };
        let text = buf.trim();
        if text.is_empty() {
            return Ok(());
        }

        let b = self.bounds;
        let field = self.selected();
        match field {
            FormField::Balance => {
                let v: f64 = text
                    .parse()
                    .map_err(|_| format!("Invalid number '{text}' for {}", field.label()))?;
                self.fields.balance = b.balance.clamp(v);
            }
            FormField::Age | FormField::Campaign | FormField::Pdays => {
                let v: i64 = text
                    .parse()
                    .map_err(|_| format!("Invalid whole number '{text}' for {}", field.label()))?;
                match field {
                    FormField::Age => self.fields.age = b.age.clamp(v),
                    FormField::Campaign => self.fields.campaign = b.campaign.clamp(v),
                    _ => self.fields.pdays = b.pdays.clamp(v),
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Current value of a field as shown in the form.
    pub fn display_value(&self, field: FormField) -> String {
        let f = &self.fields;
        match field {
            FormField::Age => f.age.to_string(),
            FormField::Job => f.job.to_string(),
            FormField::Housing => f.housing.to_string(),
            FormField::Loan => f.loan.to_string(),
            FormField::Contact => f.contact.to_string(),
            FormField::Month => f.month.to_string(),
            FormField::Balance => format!("{:.2}", f.balance),
            FormField::Campaign => f.campaign.to_string(),
            FormField::Pdays => f.pdays.to_string(),
            FormField::Submit => String::new(),
        }
    }

    /// Help line for the selected field.
    pub fn help(&self) -> String {
        let b = &self.bounds;
        match self.selected() {
            FormField::Age => format!("Age range: {}-{} years", b.age.min, b.age.max),
            FormField::Job => "Select the customer's type of job".to_string(),
            FormField::Housing => "Does the customer have a housing loan?".to_string(),
            FormField::Loan => "Does the customer have a personal loan?".to_string(),
            FormField::Contact => "Communication method used".to_string(),
            FormField::Month => "Month the customer was last contacted".to_string(),
            FormField::Balance => format!(
                "Average yearly balance in euro ({:.0} to {:.0}, step {:.0})",
                b.balance.min, b.balance.max, b.balance.step
            ),
            FormField::Campaign => format!(
                "Contacts performed during this campaign ({}-{})",
                b.campaign.min, b.campaign.max
            ),
            FormField::Pdays => format!(
                "Days since the customer was last contacted ({}-{}, -1 = never contacted)",
                b.pdays.min, b.pdays.max
            ),
            FormField::Submit => "Press Enter to predict the deposit likelihood".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Job, Month};

    fn form() -> Form {
        Form::new(FeatureBounds::default())
    }

    #[test]
    fn starts_with_documented_defaults() {
        let form = form();
        assert_eq!(form.fields, FeatureFields::default());
        assert_eq!(form.selected(), FormField::Age);
        assert_eq!(form.display_value(FormField::Balance), "1457.00");
    }

    #[test]
    fn columns_cover_every_input() {
        let mut all: Vec<FormField> = FormField::DEMOGRAPHICS.to_vec();
        all.extend(FormField::CAMPAIGN);
        all.push(FormField::Submit);
        assert_eq!(all, FormField::ALL.to_vec());
    }

    #[test]
    fn stepping_is_clamped() {
        let mut form = form();
        form.fields.age = 95;
        form.adjust(1);
        assert_eq!(form.fields.age, 95);

        form.select(FormField::Balance);
        form.adjust(1);
        assert_eq!(form.fields.balance, 1557.0);

        form.select(FormField::Pdays);
        form.fields.pdays = -1;
        form.adjust(-1);
        assert_eq!(form.fields.pdays, -1);
    }

    #[test]
    fn selectors_cycle() {
        let mut form = form();
        form.select(FormField::Job);
        form.adjust(-1);
        assert_eq!(form.fields.job, Job::Unemployed);
        form.select(FormField::Month);
        form.adjust(1);
        assert_eq!(form.fields.month, Month::Feb);
    }

    #[test]
    fn typed_values_are_clamped_into_range() {
        let mut form = form();
        form.select(FormField::Campaign);
        assert!(form.begin_edit());
        for c in "999".chars() {
            form.edit_push(c);
        }
        form.commit_edit().unwrap();
        assert_eq!(form.fields.campaign, 30);
        assert!(!form.is_editing());
    }

    #[test]
    fn balance_accepts_sign_and_decimal() {
        let mut form = form();
        form.select(FormField::Balance);
        form.begin_edit();
        for c in "-12.5.0x".chars() {
            form.edit_push(c);
        }
        assert_eq!(form.edit_buffer(), Some("-12.50"));
        form.commit_edit().unwrap();
        assert_eq!(form.fields.balance, -12.5);
    }

    #[test]
    fn lone_minus_is_rejected_without_changing_value() {
        let mut form = form();
        form.select(FormField::Pdays);
        form.begin_edit();
        form.edit_push('-');
        assert!(form.commit_edit().is_err());
        assert_eq!(form.fields.pdays, 48);
    }

    #[test]
    fn selectors_cannot_be_edited() {
        let mut form = form();
        form.select(FormField::Contact);
        assert!(!form.begin_edit());
        form.select(FormField::Submit);
        assert!(!form.begin_edit());
    }

    #[test]
    fn help_mentions_never_contacted() {
        let mut form = form();
        form.select(FormField::Pdays);
        assert!(form.help().contains("-1 = never contacted"));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut form = form();
        form.select(FormField::Loan);
        form.adjust(1);
        form.reset();
        assert_eq!(form.fields, FeatureFields::default());
    }
}
