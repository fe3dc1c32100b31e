//! Claims as handed to the trust layer by the drafting collaborator

use crate::{ApplicabilityProfile, ClaimId, EvidenceRecord, MechanismStep};
use serde::{Deserialize, Serialize};

/// Speech act of a claim
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimKind {
    /// Explains how something works; never a recommendation
    Explanatory,
    /// Tells the user what to do or expect
    #[default]
    Recommendation,
}

/// A raw claim plus everything collaborators resolved for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimInput {
    /// Claim identifier
    pub claim_id: ClaimId,

    /// Free text drafted by the language model
    pub text: String,

    /// Speech act
    #[serde(default)]
    pub kind: ClaimKind,

    /// Compound hints (e.g. "curcumin")
    #[serde(default)]
    pub compounds: Vec<String>,

    /// Receptor hints (e.g. "COX-2")
    #[serde(default)]
    pub receptors: Vec<String>,

    /// Evidence records resolved for this claim
    #[serde(default)]
    pub evidence: Vec<EvidenceRecord>,

    /// Proposed causal chain
    #[serde(default)]
    pub mechanism: Vec<MechanismStep>,

    /// Conditions the claim was established under
    #[serde(default)]
    pub applicability: ApplicabilityProfile,

    /// Evidence coverage reported by retrieval [0.0, 1.0]
    #[serde(default)]
    pub coverage_score: Option<f64>,

    /// Whether the claim matched an entry in the evidence registry
    #[serde(default)]
    pub registry_hit: bool,
}

impl ClaimInput {
    /// Create a recommendation claim with no resolved material yet
    pub fn new(claim_id: impl Into<ClaimId>, text: impl Into<String>) -> Self {
        Self {
            claim_id: claim_id.into(),
            text: text.into(),
            kind: ClaimKind::Recommendation,
            compounds: Vec::new(),
            receptors: Vec::new(),
            evidence: Vec::new(),
            mechanism: Vec::new(),
            applicability: ApplicabilityProfile::default(),
            coverage_score: None,
            registry_hit: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_claim_deserializes_with_defaults() {
        let claim: ClaimInput =
            serde_json::from_str(r#"{"claim_id": "c1", "text": "Curcumin reduces inflammation"}"#).unwrap();

        assert_eq!(claim.kind, ClaimKind::Recommendation);
        assert!(claim.evidence.is_empty());
        assert!(claim.applicability.is_empty());
        assert!(!claim.registry_hit);
    }
}
