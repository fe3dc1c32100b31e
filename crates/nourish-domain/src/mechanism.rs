//! Mechanism chain types
//!
//! A mechanism chain is the causal path compound → interaction → physiology →
//! outcome that justifies a claim. Validation lives in the gatekeeper crate;
//! this module only describes the shapes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of link in a mechanism chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    /// The compound or nutrient itself
    Compound,
    /// Molecular interaction (receptor binding, enzyme inhibition, ...)
    Interaction,
    /// Physiological effect
    Physiology,
    /// Health outcome
    Outcome,
}

impl StepType {
    /// Get the step type name
    pub fn as_str(&self) -> &'static str {
        match self {
            StepType::Compound => "compound",
            StepType::Interaction => "interaction",
            StepType::Physiology => "physiology",
            StepType::Outcome => "outcome",
        }
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of source a mechanism step cites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Chemical structure database (PubChem, ChEBI)
    ChemicalDatabase,
    /// Food composition / nutrient database (USDA FoodData Central)
    NutrientDatabase,
    /// Peer-reviewed primary literature
    PeerReviewedLiterature,
    /// Systematic review or meta-analysis
    SystematicReview,
    /// Inference from established mechanisms
    MechanisticInference,
}

impl SourceKind {
    /// Get the source kind name
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::ChemicalDatabase => "chemical_database",
            SourceKind::NutrientDatabase => "nutrient_database",
            SourceKind::PeerReviewedLiterature => "peer_reviewed_literature",
            SourceKind::SystematicReview => "systematic_review",
            SourceKind::MechanisticInference => "mechanistic_inference",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One link of a proposed causal chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MechanismStep {
    /// Link kind
    pub step_type: StepType,

    /// What happens at this link
    pub description: String,

    /// Kind of source backing this link
    pub source: SourceKind,

    /// Citation for the source (database key, DOI)
    #[serde(default)]
    pub source_ref: String,

    /// Confidence in this link [0.0, 1.0]
    pub confidence: f64,
}

impl MechanismStep {
    /// Create a new step
    pub fn new(
        step_type: StepType,
        description: impl Into<String>,
        source: SourceKind,
        confidence: f64,
    ) -> Self {
        Self {
            step_type,
            description: description.into(),
            source,
            source_ref: String::new(),
            confidence,
        }
    }
}

/// Why a chain failed validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BreakReason {
    /// No steps at all
    EmptyChain,
    /// A step confidence outside [0.0, 1.0]
    ConfidenceOutOfRange {
        /// Offending step
        index: usize,
        /// Declared confidence
        confidence: f64,
    },
    /// The chain does not start at a compound
    FirstStepNotCompound {
        /// Type of the first step
        found: StepType,
    },
    /// A step cites a source its type may not rely on
    DisallowedSource {
        /// Offending step
        index: usize,
        /// Type of the step
        step_type: StepType,
        /// Cited source kind
        source: SourceKind,
    },
    /// Compound jumps straight to an outcome
    MissingInteractionOrPhysiology {
        /// Index of the outcome step
        index: usize,
    },
    /// Any other forbidden adjacent pair
    InvalidTransition {
        /// Index of the second step of the pair
        index: usize,
        /// Type of the earlier step
        from: StepType,
        /// Type of the later step
        to: StepType,
    },
    /// The chain stops before reaching physiology or an outcome
    NonTerminalEnd {
        /// Type of the last step
        last: StepType,
    },
}

impl fmt::Display for BreakReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakReason::EmptyChain => write!(f, "mechanism chain is empty"),
            BreakReason::ConfidenceOutOfRange { index, confidence } => {
                write!(f, "step {} confidence {} is outside [0, 1]", index, confidence)
            }
            BreakReason::FirstStepNotCompound { found } => {
                write!(f, "chain must start with a compound, found {}", found)
            }
            BreakReason::DisallowedSource { index, step_type, source } => write!(
                f,
                "step {} ({}) cannot be backed by a {} source",
                index, step_type, source
            ),
            BreakReason::MissingInteractionOrPhysiology { index } => write!(
                f,
                "missing interaction/physiology step before outcome at step {}",
                index
            ),
            BreakReason::InvalidTransition { index, from, to } => {
                write!(f, "invalid transition {} -> {} at step {}", from, to, index)
            }
            BreakReason::NonTerminalEnd { last } => {
                write!(f, "chain ends at {}, expected physiology or outcome", last)
            }
        }
    }
}

/// A validated mechanism chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MechanismChain {
    /// Steps in causal order
    pub steps: Vec<MechanismStep>,

    /// Whether the chain passed every structural rule
    pub valid: bool,

    /// Minimum per-step confidence (0.0 for an empty chain)
    pub weakest_link_confidence: f64,

    /// First violated rule, when invalid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_reason: Option<BreakReason>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_interaction_message() {
        let reason = BreakReason::MissingInteractionOrPhysiology { index: 1 };
        assert!(reason.to_string().contains("missing interaction/physiology"));
    }

    #[test]
    fn test_break_reason_serializes_tagged() {
        let reason = BreakReason::NonTerminalEnd { last: StepType::Interaction };
        let json = serde_json::to_string(&reason).unwrap();
        assert_eq!(json, r#"{"kind":"non_terminal_end","last":"interaction"}"#);
    }
}
