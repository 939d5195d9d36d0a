//! Formatted terminal output.
//!
//! Formatting lives here so the scoring code stays clean and output changes
//! stay localized.

use crate::domain::{Column, FeatureRecord};
use crate::models::Model;
use crate::report::Outcome;

/// Width of the ASCII progress bar in `format_outcome`.
const BAR_WIDTH: usize = 40;

/// Format one scored record: inputs, banner, metrics, bar and interpretation.
pub fn format_outcome(record: &FeatureRecord, outcome: &Outcome, model_name: &str) -> String {
    let mut out = String::new();

    out.push_str("=== deposit - Term Deposit Prediction ===\n");
    out.push_str(&format!("Model: {model_name}\n\n"));

    out.push_str("Inputs:\n");
    for column in Column::ALL {
        out.push_str(&format!("  {:<10} {}\n", column.name(), fmt_value(record, column)));
    }

    out.push_str("\nPrediction:\n");
    let mark = if outcome.banner.is_positive() { "[+]" } else { "[-]" };
    out.push_str(&format!("  {mark} {}\n", outcome.banner.text()));
    out.push_str(&format!("  Probability NO : {:>5.1}%\n", outcome.p_no_pct));
    out.push_str(&format!("  Probability YES: {:>5.1}%\n", outcome.p_yes_pct));

    out.push_str("\nConfidence:\n");
    out.push_str(&format!(
        "  {} {:.1}%\n",
        ascii_bar(outcome.progress, BAR_WIDTH),
        outcome.p_yes_pct
    ));

    out.push_str("\nInterpretation:\n");
    out.push_str(&format!(
        "  {}: {}\n",
        outcome.tier.title(),
        outcome.tier.interpretation()
    ));

    out
}

/// Format the model information panel.
pub fn format_model_info(model: &Model) -> String {
    let mut out = String::new();

    out.push_str("=== Model information ===\n");
    out.push_str(&format!("Model: {}\n", model.name()));
    out.push_str(&format!("Kind : {}", model.kind_name()));
    if model.tree_count() > 0 {
        out.push_str(&format!(" ({} trees)", model.tree_count()));
    }
    out.push('\n');
    out.push_str(&format!("Decision threshold: {:.2}\n", model.threshold()));

    out.push_str("\nPrediction target:\n");
    out.push_str("- customer is likely to open a term deposit\n");
    out.push_str("- customer is unlikely to open a term deposit\n");

    out.push_str("\nFeatures used:\n");
    for name in model.feature_names() {
        let description = Column::from_name(name)
            .map(Column::description)
            .unwrap_or("(not provided by this form)");
        out.push_str(&format!("- {name}: {description}\n"));
    }

    out
}

/// Render `ratio` (clamped to `[0, 1]`) as `[#####-----]`.
pub fn ascii_bar(ratio: f64, width: usize) -> String {
    let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
    let filled = (ratio * width as f64).round() as usize;
    let mut out = String::with_capacity(width + 2);
    out.push('[');
    out.push_str(&"#".repeat(filled));
    out.push_str(&"-".repeat(width - filled));
    out.push(']');
    out
}

fn fmt_value(record: &FeatureRecord, column: Column) -> String {
    let f = record.fields();
    match column {
        Column::Age => f.age.to_string(),
        Column::Job => f.job.to_string(),
        Column::Housing => f.housing.to_string(),
        Column::Loan => f.loan.to_string(),
        Column::Contact => f.contact.to_string(),
        Column::Month => f.month.to_string(),
        Column::Balance => format!("{:.2}", f.balance),
        Column::Campaign => f.campaign.to_string(),
        Column::Pdays if f.pdays == -1 => "-1 (never contacted)".to_string(),
        Column::Pdays => f.pdays.to_string(),
    }
}
