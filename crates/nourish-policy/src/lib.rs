//! Nourish Evidence Policy
//!
//! Versioned, sealed scoring policies and the engine that executes them.
//!
//! # Overview
//!
//! An [`EvidencePolicy`] is data, not code: a baseline score, an ordered list
//! of rules drawn from a closed set of categories, and a tier threshold table.
//! The policy is sealed by a SHA-256 content hash over exactly those logic
//! fields, so governance metadata can be corrected without changing the hash
//! while any change to scoring produces a new one.
//!
//! [`execute`] runs a policy against one claim's frozen evidence and returns a
//! [`ConfidenceBreakdown`], the only account of how a confidence score was
//! reached.
//!
//! # Failure
//!
//! Integrity and governance failures are hard errors. There is no fallback
//! score.

#![warn(missing_docs)]

mod artifact;
mod engine;
mod error;
mod hashing;
mod registry;

pub use artifact::{
    EvidencePolicy, GovernanceMetadata, PolicyDraft, PolicyRule, RuleCategory, RuleSpec, TieBreak,
    TierLadder, TierThreshold,
};
pub use engine::{execute, ConfidenceBreakdown, ObservedInput, RuleFiring};
pub use error::PolicyError;
pub use hashing::{attestation_for, content_hash};
pub use registry::PolicyRegistry;
