//! Request and response types for a turn

use crate::ClarifyingQuestion;
use nourish_belief::{BeliefRevision, FieldUpdate, ReversalExplanation};
use nourish_domain::{ClaimId, ClaimInput, DecisionDelta, EvidenceStrength, RecommendationResult, SessionId};
use nourish_gatekeeper::GateReport;
use nourish_janitor::ResetAction;
use nourish_policy::ConfidenceBreakdown;
use serde::{Deserialize, Serialize};

/// Everything collaborators resolved for one conversational turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnInput {
    /// Turn number, strictly increasing within a session
    pub turn: u32,

    /// Wall-clock time of the turn (seconds since Unix epoch)
    pub now: u64,

    /// The user's utterance, checked for topic-shift phrases
    #[serde(default)]
    pub utterance: Option<String>,

    /// Context the user stated this turn
    #[serde(default)]
    pub context: Vec<FieldUpdate>,

    /// Claims drafted for this turn
    #[serde(default)]
    pub claims: Vec<ClaimInput>,
}

impl TurnInput {
    /// Create an empty turn
    pub fn new(turn: u32, now: u64) -> Self {
        Self {
            turn,
            now,
            utterance: None,
            context: Vec::new(),
            claims: Vec::new(),
        }
    }

    /// Attach the user's utterance
    pub fn with_utterance(mut self, utterance: impl Into<String>) -> Self {
        self.utterance = Some(utterance.into());
        self
    }

    /// Add a context update
    pub fn with_context(mut self, update: FieldUpdate) -> Self {
        self.context.push(update);
        self
    }

    /// Add a claim
    pub fn with_claim(mut self, claim: ClaimInput) -> Self {
        self.claims.push(claim);
        self
    }
}

/// The trust layer's verdict on one claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimOutcome {
    /// Claim identifier
    pub claim_id: ClaimId,

    /// Policy score and per-rule trace
    pub breakdown: ConfidenceBreakdown,

    /// Mechanism chain, risk, applicability and the gate's raw decision
    pub gate: GateReport,

    /// min(policy score, weakest mechanism link)
    pub effective_confidence: f64,

    /// Strength class of the effective confidence
    pub strength: EvidenceStrength,

    /// Decision delivered to the user (differs from the gate's when held)
    pub recommendation: RecommendationResult,

    /// Whether a saturation hold replaced the gate's upgrade
    pub held: bool,

    /// Comparison against the session's prior decision
    pub delta: DecisionDelta,

    /// Present whenever the delta is not STABLE
    pub explanation: Option<ReversalExplanation>,
}

/// Result of processing one turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// Session the turn belongs to
    pub session_id: SessionId,

    /// Turn number
    pub turn: u32,

    /// Reset applied before the turn
    pub reset: ResetAction,

    /// Belief revisions the stated context produced
    pub revisions: Vec<BeliefRevision>,

    /// Per-claim outcomes, in input order
    pub claims: Vec<ClaimOutcome>,

    /// Clarifying question to ask, if any
    pub question: Option<ClarifyingQuestion>,

    /// Whether the session is saturated after this turn
    pub saturated: bool,
}

impl TurnOutcome {
    /// Outcomes whose decision changed and therefore carry an explanation
    pub fn reversals(&self) -> impl Iterator<Item = &ReversalExplanation> {
        self.claims.iter().filter_map(|c| c.explanation.as_ref())
    }

    /// Look up the outcome for a claim
    pub fn claim(&self, claim_id: &ClaimId) -> Option<&ClaimOutcome> {
        self.claims.iter().find(|c| &c.claim_id == claim_id)
    }
}
