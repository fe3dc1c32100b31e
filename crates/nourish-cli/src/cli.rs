//! CLI command definitions and argument parsing.

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Nourish CLI - Manage evidence policies and replay conversations through the trust layer.
#[derive(Debug, Parser)]
#[command(name = "nourish")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log cascade steps and rule firings (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
        }
    }
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate, hash or seal evidence policy artifacts
    Policy(PolicyArgs),

    /// Replay a transcript of turns against a session
    Evaluate(EvaluateArgs),
}

/// Arguments for the policy command.
#[derive(Debug, Parser)]
pub struct PolicyArgs {
    #[command(subcommand)]
    pub action: PolicyAction,
}

/// Policy subcommands.
#[derive(Debug, Subcommand)]
pub enum PolicyAction {
    /// Verify a published artifact (hash, attestation, governance, rules)
    Validate {
        /// Artifact file (.toml or .json)
        file: PathBuf,
    },

    /// Print the content hash of an artifact or draft
    Hash {
        /// Artifact or draft file (.toml or .json)
        file: PathBuf,
    },

    /// Seal a draft into a publishable artifact
    Seal {
        /// Draft file (.toml or .json)
        file: PathBuf,

        /// Write the sealed artifact here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Arguments for the evaluate command.
#[derive(Debug, Parser)]
pub struct EvaluateArgs {
    /// Directory of published policy artifacts
    #[arg(long, default_value = "policies")]
    pub policy_dir: PathBuf,

    /// Policy identifier
    #[arg(long)]
    pub policy_id: String,

    /// Policy version (MAJOR.MINOR.PATCH)
    #[arg(long)]
    pub policy_version: String,

    /// JSON file holding an array of turns
    #[arg(short, long)]
    pub turns: PathBuf,

    /// Session file; loaded if present and written back after the run
    #[arg(short, long)]
    pub session: Option<PathBuf>,

    /// Engine configuration (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policy_seal() {
        let cli = Cli::parse_from(["nourish", "policy", "seal", "draft.toml", "-o", "sealed.toml"]);
        match cli.command {
            Command::Policy(PolicyArgs {
                action: PolicyAction::Seal { file, output },
            }) => {
                assert_eq!(file, PathBuf::from("draft.toml"));
                assert_eq!(output, Some(PathBuf::from("sealed.toml")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_evaluate_with_global_flags() {
        let cli = Cli::parse_from([
            "nourish",
            "evaluate",
            "--policy-id",
            "nutrition-evidence",
            "--policy-version",
            "1.0.0",
            "--turns",
            "turns.json",
            "--format",
            "json",
            "--verbose",
        ]);
        assert!(matches!(cli.format, CliFormat::Json));
        assert!(cli.verbose);
        match cli.command {
            Command::Evaluate(args) => {
                assert_eq!(args.policy_dir, PathBuf::from("policies"));
                assert_eq!(args.policy_version, "1.0.0");
                assert!(args.session.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_evaluate_requires_policy_id() {
        let result = Cli::try_parse_from(["nourish", "evaluate", "--policy-version", "1.0.0", "--turns", "t.json"]);
        assert!(result.is_err());
    }
}
