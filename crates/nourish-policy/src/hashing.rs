//! Content hashing for policy artifacts
//!
//! The hash covers the logic fields only: baseline score, tie-break rule,
//! tier thresholds and rules. Identity, publication time and governance
//! metadata are excluded so that re-approving identical logic keeps its hash.

use crate::{PolicyError, PolicyRule, TieBreak, TierThreshold};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Canonical view of the hashed fields, in a fixed field order
#[derive(Serialize)]
struct LogicFields<'a> {
    baseline_score: f64,
    tie_break: TieBreak,
    tier_thresholds: &'a [TierThreshold],
    rules: &'a [PolicyRule],
}

/// SHA-256 (hex) over the compact JSON encoding of the logic fields
pub fn content_hash(
    baseline_score: f64,
    tie_break: TieBreak,
    tier_thresholds: &[TierThreshold],
    rules: &[PolicyRule],
) -> Result<String, PolicyError> {
    let logic = LogicFields {
        baseline_score,
        tie_break,
        tier_thresholds,
        rules,
    };
    let canonical =
        serde_json::to_vec(&logic).map_err(|e| PolicyError::Serialization(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    Ok(hex::encode(hasher.finalize()))
}

/// Attestation string vouching for a content hash
pub fn attestation_for(hash: &str) -> String {
    format!("sha256:{}", hash)
}
