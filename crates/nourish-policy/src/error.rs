//! Policy error types
//!
//! Every variant is a governance or integrity failure: the caller must abort
//! the claim and never substitute a default confidence.

use thiserror::Error;

/// Errors raised while loading, validating or executing an evidence policy
#[derive(Error, Debug)]
pub enum PolicyError {
    /// No policy with this id and version is registered
    #[error("Policy not found: {policy_id}@{version}")]
    NotFound {
        /// Requested policy id
        policy_id: String,
        /// Requested version
        version: String,
    },

    /// Declared content hash does not match the recomputed one
    #[error("Policy {policy_id} hash mismatch: declared {declared}, computed {computed}")]
    HashMismatch {
        /// Policy id
        policy_id: String,
        /// Hash stored in the artifact
        declared: String,
        /// Hash recomputed from the logic fields
        computed: String,
    },

    /// Attestation string does not vouch for the content hash
    #[error("Policy {policy_id} attestation '{attestation}' does not match its content hash")]
    AttestationMismatch {
        /// Policy id
        policy_id: String,
        /// Attestation stored in the artifact
        attestation: String,
    },

    /// A rule declares a category the engine does not know
    #[error("Rule '{rule_id}' has unknown category '{category}'")]
    UnknownRuleCategory {
        /// Rule id
        rule_id: String,
        /// Declared category
        category: String,
    },

    /// Governance metadata is absent or incomplete
    #[error("Policy {policy_id} is missing governance metadata: {field}")]
    MissingGovernance {
        /// Policy id
        policy_id: String,
        /// Missing field
        field: &'static str,
    },

    /// A rule lacks a parameter its category requires
    #[error("Rule '{rule_id}' is missing parameter '{parameter}'")]
    MissingRuleParameter {
        /// Rule id
        rule_id: String,
        /// Missing parameter name
        parameter: String,
    },

    /// A rule parameter has an unusable value or name
    #[error("Rule '{rule_id}' parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Rule id
        rule_id: String,
        /// Parameter name
        parameter: String,
        /// What is wrong with it
        reason: String,
    },

    /// Tier threshold table is unusable
    #[error("Invalid tier thresholds: {0}")]
    InvalidThresholds(String),

    /// Version is not MAJOR.MINOR.PATCH
    #[error("Invalid policy version: {0}")]
    InvalidVersion(String),

    /// Any other structural problem with the artifact
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// The evidence set handed to the engine belongs to another claim
    #[error("Evidence set was frozen for claim '{found}', not '{expected}'")]
    EvidenceMismatch {
        /// Claim being scored
        expected: String,
        /// Claim the set was frozen for
        found: String,
    },

    /// Two artifacts share the same id and version
    #[error("Duplicate policy: {policy_id}@{version}")]
    DuplicatePolicy {
        /// Policy id
        policy_id: String,
        /// Version
        version: String,
    },

    /// Artifact could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Artifact could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PolicyError {
    fn from(e: serde_json::Error) -> Self {
        PolicyError::Parse(e.to_string())
    }
}

impl From<toml::de::Error> for PolicyError {
    fn from(e: toml::de::Error) -> Self {
        PolicyError::Parse(e.to_string())
    }
}
