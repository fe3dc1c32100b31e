//! Policy command implementation.

use crate::cli::{PolicyAction, PolicyArgs};
use crate::commands::write_atomic;
use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use nourish_policy::{content_hash, EvidencePolicy, PolicyDraft, PolicyError};
use std::fs;
use std::path::Path;
use tracing::info;

/// Execute the policy command.
pub fn execute_policy(args: PolicyArgs, formatter: &Formatter) -> Result<()> {
    match args.action {
        PolicyAction::Validate { file } => {
            let policy = validate_artifact(&file)?;
            println!("{}", formatter.format_policy(&policy)?);
            if formatter.format() == OutputFormat::Table {
                println!(
                    "{}",
                    formatter.success(&format!(
                        "{}@{} verified",
                        policy.policy_id(),
                        policy.version()
                    ))
                );
            }
        }
        PolicyAction::Hash { file } => {
            println!("{}", formatter.format_hash(&hash_file(&file)?)?);
        }
        PolicyAction::Seal { file, output } => {
            let policy = seal_draft(&file)?;
            match output {
                Some(path) => {
                    write_atomic(&path, render_artifact(&policy, is_json(&path))?.as_bytes())?;
                    println!(
                        "{}",
                        formatter.success(&format!(
                            "Sealed {}@{} ({}) to {}",
                            policy.policy_id(),
                            policy.version(),
                            policy.attestation(),
                            path.display()
                        ))
                    );
                }
                None => {
                    let json = formatter.format() == OutputFormat::Json;
                    print!("{}", render_artifact(&policy, json)?);
                }
            }
        }
    }
    Ok(())
}

/// Read a published artifact without validating it.
pub fn read_artifact(path: &Path) -> Result<EvidencePolicy> {
    let contents = fs::read_to_string(path)?;
    let policy = if is_json(path) {
        EvidencePolicy::from_json(&contents)?
    } else {
        EvidencePolicy::from_toml(&contents)?
    };
    Ok(policy)
}

/// Read and fully verify a published artifact.
pub fn validate_artifact(path: &Path) -> Result<EvidencePolicy> {
    let policy = read_artifact(path)?;
    policy.validate()?;
    info!(
        path = %path.display(),
        policy_id = policy.policy_id(),
        version = policy.version(),
        content_hash = policy.content_hash(),
        "Policy artifact verified"
    );
    Ok(policy)
}

/// Read a draft. Sealed artifacts read as drafts too; their hash fields are ignored.
pub fn read_draft(path: &Path) -> Result<PolicyDraft> {
    let contents = fs::read_to_string(path)?;
    let draft = if is_json(path) {
        serde_json::from_str(&contents).map_err(PolicyError::from)?
    } else {
        PolicyDraft::from_toml(&contents)?
    };
    Ok(draft)
}

/// Content hash of the logic fields of an artifact or draft.
pub fn hash_file(path: &Path) -> Result<String> {
    let draft = read_draft(path)?;
    Ok(content_hash(
        draft.baseline_score,
        draft.tie_break,
        &draft.tier_thresholds,
        &draft.rules,
    )?)
}

/// Seal a draft into a validated artifact.
pub fn seal_draft(path: &Path) -> Result<EvidencePolicy> {
    let policy = read_draft(path)?.seal()?;
    info!(
        policy_id = policy.policy_id(),
        version = policy.version(),
        content_hash = policy.content_hash(),
        "Sealed policy draft"
    );
    Ok(policy)
}

fn render_artifact(policy: &EvidencePolicy, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(policy)?)
    } else {
        policy.to_toml().map_err(CliError::from)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}
