//! Nourish CLI - Command-line interface for the nutrition trust layer.

use anyhow::Context;
use clap::Parser;
use nourish_cli::commands;
use nourish_cli::{Cli, Command, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` overrides the level chosen by `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let formatter = Formatter::new(cli.format.into(), !cli.no_color);

    match cli.command {
        Command::Policy(args) => {
            commands::execute_policy(args, &formatter).context("policy command failed")?;
        }
        Command::Evaluate(args) => {
            let context = format!(
                "evaluation against {}@{} failed",
                args.policy_id, args.policy_version
            );
            commands::execute_evaluate(args, &formatter).context(context)?;
        }
    }

    Ok(())
}
