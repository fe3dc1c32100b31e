//! Recommendation decisions, reason codes and deltas

use crate::ClaimId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal decision of the recommendation gate
///
/// The hierarchy `Allow > RequireMoreContext > Withhold` is what the
/// decision comparator uses to tell upgrades from downgrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The claim may be asserted to the user
    Allow,
    /// The claim needs more user context before it can be asserted
    RequireMoreContext,
    /// The claim must not be asserted
    Withhold,
}

impl Decision {
    /// Position in the decision hierarchy (higher is more permissive)
    pub fn rank(&self) -> u8 {
        match self {
            Decision::Allow => 2,
            Decision::RequireMoreContext => 1,
            Decision::Withhold => 0,
        }
    }

    /// Get the decision name
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::RequireMoreContext => "require_more_context",
            Decision::Withhold => "withhold",
        }
    }

    /// Parse a decision from its name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "allow" => Some(Decision::Allow),
            "require_more_context" => Some(Decision::RequireMoreContext),
            "withhold" => Some(Decision::Withhold),
            _ => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid decision: {}", s))
    }
}

/// Machine-readable reason attached to every decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// Explanatory speech only, never a recommendation
    SafeToDiscussOnly,
    /// Broken mechanism, unknown risk or missing critical context
    InsufficientContext,
    /// A known moderate or high severity risk applies
    IdentifiedRisk,
    /// The evidence was gathered in a different population
    PopulationMismatch,
    /// Mechanism valid, no risk, applicable
    MechanismStrong,
    /// Upgrade refused after the clarification budget was exhausted
    SaturationHold,
}

impl ReasonCode {
    /// Get the reason code name
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::SafeToDiscussOnly => "safe_to_discuss_only",
            ReasonCode::InsufficientContext => "insufficient_context",
            ReasonCode::IdentifiedRisk => "identified_risk",
            ReasonCode::PopulationMismatch => "population_mismatch",
            ReasonCode::MechanismStrong => "mechanism_strong",
            ReasonCode::SaturationHold => "saturation_hold",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the recommendation gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationResult {
    /// Terminal decision
    pub decision: Decision,
    /// Reason code
    pub reason: ReasonCode,
    /// Human-readable explanation, filled from fixed templates
    pub explanation: String,
}

impl RecommendationResult {
    /// Create a new result
    pub fn new(decision: Decision, reason: ReasonCode, explanation: impl Into<String>) -> Self {
        Self {
            decision,
            reason,
            explanation: explanation.into(),
        }
    }
}

/// Classification of a decision against the prior turn's decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    /// No prior decision for this claim
    NewDecision,
    /// Same decision as before
    Stable,
    /// Moved up the hierarchy
    Upgrade,
    /// Moved down the hierarchy
    Downgrade,
}

impl ChangeType {
    /// Get the change name
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::NewDecision => "NEW_DECISION",
            ChangeType::Stable => "STABLE",
            ChangeType::Upgrade => "UPGRADE",
            ChangeType::Downgrade => "DOWNGRADE",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-claim comparison of the current and prior decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionDelta {
    /// Claim compared
    pub claim_id: ClaimId,
    /// Decision recorded in an earlier turn
    pub prior: Option<Decision>,
    /// Decision of this turn
    pub current: Decision,
    /// Classification
    pub change: ChangeType,
}

impl DecisionDelta {
    /// Whether the change must be accompanied by a reversal explanation
    pub fn requires_explanation(&self) -> bool {
        self.change != ChangeType::Stable
    }
}

/// Coarse strength of the evidence behind a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvidenceStrength {
    /// Thin or low-quality evidence
    Weak,
    /// Some supporting evidence
    Moderate,
    /// Evidence strong enough to override saturation
    Strong,
}

impl EvidenceStrength {
    /// Get the strength name
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceStrength::Weak => "WEAK",
            EvidenceStrength::Moderate => "MODERATE",
            EvidenceStrength::Strong => "STRONG",
        }
    }
}

impl fmt::Display for EvidenceStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
