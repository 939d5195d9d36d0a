//! `deposit-scorer` library crate.
//!
//! The binary (`deposit`) is a thin wrapper around this library so that:
//!
//! - scoring logic is testable without spawning processes
//! - the gateway and renderer are reusable from the CLI and the TUI alike
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod models;
pub mod report;
pub mod tui;
