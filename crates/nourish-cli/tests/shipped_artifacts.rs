//! Integration tests for the policy artifacts and demo transcript shipped with the repository

use nourish_cli::cli::EvaluateArgs;
use nourish_cli::commands::evaluate::run_transcript;
use nourish_cli::commands::policy::{hash_file, validate_artifact};
use nourish_domain::{ChangeType, Decision};
use std::path::PathBuf;

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

#[test]
fn test_shipped_policy_verifies() {
    let path = repo_root().join("policies/nutrition-evidence-1.0.0.toml");

    let policy = validate_artifact(&path).unwrap();
    assert_eq!(policy.policy_id(), "nutrition-evidence");
    assert_eq!(policy.version(), "1.0.0");
    assert_eq!(hash_file(&path).unwrap(), policy.content_hash());
}

#[test]
fn test_demo_transcript_replays() {
    let root = repo_root();
    let args = EvaluateArgs {
        policy_dir: root.join("policies"),
        policy_id: "nutrition-evidence".to_string(),
        policy_version: "1.0.0".to_string(),
        turns: root.join("demos/omega3-transcript.json"),
        session: None,
        config: Some(root.join("demos/engine.toml")),
    };

    let outcomes = run_transcript(&args).unwrap();
    assert_eq!(outcomes.len(), 3);

    // Dose unknown: ask for it
    let turn1 = &outcomes[0].claims[0];
    assert_eq!(turn1.recommendation.decision, Decision::RequireMoreContext);
    assert!(outcomes[0].question.is_some());

    // Dose stated: allowed, and the upgrade is explained
    let turn2 = &outcomes[1].claims[0];
    assert_eq!(turn2.recommendation.decision, Decision::Allow);
    assert_eq!(turn2.delta.change, ChangeType::Upgrade);
    assert!(turn2.explanation.is_some());

    // Population contradicted: back to needing context
    let turn3 = &outcomes[2].claims[0];
    assert_eq!(turn3.recommendation.decision, Decision::RequireMoreContext);
    assert_eq!(turn3.delta.change, ChangeType::Downgrade);
    assert!(turn3.gate.risk.unknown_risk);
}
