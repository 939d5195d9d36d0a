//! Command-line parsing for the deposit scorer.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! scoring code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Overrides;
use crate::domain::RawInputs;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "deposit", version, about = "Term deposit subscription predictor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive form.
    Tui(TuiArgs),
    /// Score one customer record and print the result.
    Score(ScoreArgs),
    /// Print information about the loaded model.
    Info(ModelArgs),
}

/// Options shared by every command.
#[derive(Debug, Args, Clone, Default)]
pub struct ModelArgs {
    /// Model artifact (defaults to $DEPOSIT_MODEL_PATH, then `bestmodel.mdl`).
    #[arg(long, value_name = "FILE")]
    pub model: Option<PathBuf>,

    /// TOML file overriding the numeric feature bounds.
    #[arg(long, value_name = "TOML")]
    pub bounds: Option<PathBuf>,
}

impl ModelArgs {
    pub fn overrides(&self, log_file: Option<PathBuf>) -> Overrides {
        Overrides {
            model: self.model.clone(),
            bounds: self.bounds.clone(),
            log_file,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Append log output to this file.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

/// Customer attributes for `deposit score`. Every field defaults to the
/// form's default value.
#[derive(Debug, Args, Clone)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Customer age.
    #[arg(long, default_value_t = 41, allow_negative_numbers = true)]
    pub age: i64,

    /// Job category (e.g. admin., blue-collar, retired).
    #[arg(long, default_value = "admin.")]
    pub job: String,

    /// Has a housing loan (no/yes).
    #[arg(long, default_value = "no")]
    pub housing: String,

    /// Has a personal loan (no/yes).
    #[arg(long, default_value = "no")]
    pub loan: String,

    /// Contact method (cellular/telephone).
    #[arg(long, default_value = "cellular")]
    pub contact: String,

    /// Month of last contact (jan..dec).
    #[arg(long, default_value = "jan")]
    pub month: String,

    /// Average yearly balance (EUR).
    #[arg(long, default_value_t = 1457.0, allow_negative_numbers = true)]
    pub balance: f64,

    /// Contacts performed during this campaign.
    #[arg(long, default_value_t = 3, allow_negative_numbers = true)]
    pub campaign: i64,

    /// Days since last contact (-1 = never contacted).
    #[arg(long, default_value_t = 48, allow_negative_numbers = true)]
    pub pdays: i64,

    /// Print the result as JSON instead of a text report.
    #[arg(long)]
    pub json: bool,

    /// Also write the result JSON to this file.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

impl ScoreArgs {
    pub fn raw_inputs(&self) -> RawInputs {
        RawInputs {
            age: self.age,
            job: self.job.clone(),
            housing: self.housing.clone(),
            loan: self.loan.clone(),
            contact: self.contact.clone(),
            month: self.month.clone(),
            balance: self.balance,
            campaign: self.campaign,
            pdays: self.pdays,
        }
    }
}
