//! Evaluate command implementation.

use crate::cli::EvaluateArgs;
use crate::commands::write_atomic;
use crate::config::load_engine_config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use nourish_belief::BeliefState;
use nourish_domain::SessionId;
use nourish_engine::{TurnEngine, TurnInput, TurnOutcome};
use nourish_policy::PolicyRegistry;
use std::fs;
use std::path::Path;
use tracing::info;

/// Execute the evaluate command.
pub fn execute_evaluate(args: EvaluateArgs, formatter: &Formatter) -> Result<()> {
    let outcomes = run_transcript(&args)?;
    println!("{}", formatter.format_outcomes(&outcomes)?);
    Ok(())
}

/// Replay every turn of a transcript against one session.
///
/// The session file is replaced atomically and only when every turn
/// succeeded, so a failed or interrupted run leaves it exactly as it was.
pub fn run_transcript(args: &EvaluateArgs) -> Result<Vec<TurnOutcome>> {
    let config = load_engine_config(args.config.as_deref())?;
    let registry = PolicyRegistry::load_dir(&args.policy_dir)?;
    let engine = TurnEngine::from_registry(&registry, &args.policy_id, &args.policy_version, config)?;

    let turns = read_turns(&args.turns)?;
    let mut state = match args.session.as_deref() {
        Some(path) if path.exists() => load_session(path)?,
        _ => {
            let created_at = turns.first().map(|t| t.now).unwrap_or_default();
            BeliefState::new(SessionId::new(), created_at)
        }
    };

    let mut outcomes = Vec::with_capacity(turns.len());
    for turn in &turns {
        outcomes.push(engine.process_turn(&mut state, turn)?);
    }

    if let Some(path) = args.session.as_deref() {
        write_atomic(path, state.to_json()?.as_bytes())?;
        info!(
            session_id = %state.session_id(),
            path = %path.display(),
            turn = state.current_turn(),
            "Saved session"
        );
    }

    Ok(outcomes)
}

/// Read a transcript: a JSON array of turns.
pub fn read_turns(path: &Path) -> Result<Vec<TurnInput>> {
    let contents = fs::read_to_string(path)?;
    let turns: Vec<TurnInput> = serde_json::from_str(&contents)?;
    if turns.windows(2).any(|w| w[1].turn <= w[0].turn) {
        return Err(CliError::InvalidInput(format!(
            "{}: turn numbers must be strictly increasing",
            path.display()
        )));
    }
    Ok(turns)
}

/// Load a saved session.
pub fn load_session(path: &Path) -> Result<BeliefState> {
    let contents = fs::read_to_string(path)?;
    Ok(BeliefState::from_json(&contents)?)
}
