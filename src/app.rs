//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves settings and installs logging
//! - loads the model gateway once
//! - dispatches to the form, the one-shot scorer or the info printer

use clap::Parser;

use crate::cli::{Command, ModelArgs, ScoreArgs, TuiArgs};
use crate::config::Settings;
use crate::error::AppError;
use crate::logging::{self, LogSink};

pub mod pipeline;

use pipeline::Session;

/// Entry point for the `deposit` binary.
pub fn run() -> Result<(), AppError> {
    // `deposit` and `deposit --model x.mdl` behave like `deposit tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Score(args) => handle_score(args),
        Command::Info(args) => handle_info(args),
    }
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let settings = Settings::load(&args.model.overrides(args.log_file.clone()))?;
    logging::init(&settings.log_filter, LogSink::for_tui(settings.log_file.clone()))?;

    let session = Session::start(&settings);
    crate::tui::run(session)
}

fn handle_score(args: ScoreArgs) -> Result<(), AppError> {
    let settings = Settings::load(&args.model.overrides(None))?;
    logging::init(&settings.log_filter, LogSink::Stderr)?;

    let session = Session::start(&settings);
    if let Some(err) = session.gateway.load_error() {
        return Err(err.into());
    }

    let scored = pipeline::score_raw(&session, &args.raw_inputs())?;
    let export = scored.export_file(session.model_name(), chrono::Local::now());

    if args.json {
        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| AppError::new(5, format!("Failed to serialize result: {e}")))?;
        println!("{json}");
    } else {
        println!(
            "{}",
            crate::report::format_outcome(&scored.record, &scored.outcome, session.model_name())
        );
    }

    if let Some(path) = &args.export {
        crate::io::write_outcome_json(path, &export)?;
        tracing::info!(path = %path.display(), "wrote result");
    }

    Ok(())
}

fn handle_info(args: ModelArgs) -> Result<(), AppError> {
    let settings = Settings::load(&args.overrides(None))?;
    logging::init(&settings.log_filter, LogSink::Stderr)?;

    let session = Session::start(&settings);
    let model = session.gateway.model().map_err(AppError::from)?;

    println!("{}", crate::report::format_model_info(model));
    if let Err(err) = model.check_schema() {
        println!("warning: {err}");
    }
    Ok(())
}

/// Rewrite argv so `deposit` defaults to `deposit tui`.
///
/// Rules:
/// - `deposit`                      -> `deposit tui`
/// - `deposit --model x.mdl ...`    -> `deposit tui --model x.mdl ...`
/// - `deposit --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "score" | "info");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_launches_tui() {
        assert_eq!(rewrite_args(argv(&["deposit"])), argv(&["deposit", "tui"]));
    }

    #[test]
    fn leading_flags_go_to_tui() {
        assert_eq!(
            rewrite_args(argv(&["deposit", "--model", "m.mdl"])),
            argv(&["deposit", "tui", "--model", "m.mdl"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        assert_eq!(
            rewrite_args(argv(&["deposit", "score", "--age", "30"])),
            argv(&["deposit", "score", "--age", "30"])
        );
        assert_eq!(rewrite_args(argv(&["deposit", "--help"])), argv(&["deposit", "--help"]));
    }
}
