//! Nourish CLI library.
//!
//! Command parsing, engine configuration loading, command execution and
//! output formatting for the `nourish` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::OutputFormat;
pub use error::{CliError, Result};
pub use output::Formatter;
