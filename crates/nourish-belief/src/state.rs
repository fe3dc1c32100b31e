//! Per-session belief state
//!
//! What the assistant has learned about one user, when it learned it, and
//! what it previously decided for each claim. Callers never assign fields
//! directly; every change goes through a method so that turn stamps,
//! supersession marks and the revision log stay consistent.

use crate::{BeliefError, BeliefField, BeliefRevision, FieldValue};
use nourish_domain::{ClaimId, Decision, ReasonCode, SessionId, UserContext};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Identity of the policy that produced a decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRef {
    /// Policy id
    pub policy_id: String,
    /// Policy version
    pub version: String,
    /// Policy content hash
    pub content_hash: String,
}

/// A decision recorded for a claim in an earlier turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorDecision {
    /// Decision
    pub decision: Decision,
    /// Confidence behind the decision; decays with inactivity
    pub confidence: f64,
    /// Reason code
    pub reason: ReasonCode,
    /// Policy that scored the claim
    pub policy: PolicyRef,
    /// Turn the decision was made in
    pub turn: u32,
}

/// Epistemic memory of one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefState {
    session_id: SessionId,
    created_at: u64,
    last_active_at: u64,
    current_turn: u32,

    population: Option<String>,
    dietary_pattern: Option<String>,
    dose_info: Option<String>,
    known_conditions: Vec<String>,
    medications: Vec<String>,

    learned_at: BTreeMap<BeliefField, u32>,
    superseded: Vec<BeliefField>,
    revisions: Vec<BeliefRevision>,

    prior_decisions: BTreeMap<ClaimId, PriorDecision>,

    clarification_count: u32,
    asked_questions: Vec<String>,
    saturated_at_turn: Option<u32>,

    #[serde(default)]
    decayed_at: Option<u64>,
}

impl BeliefState {
    /// Start a session at `now` (seconds since Unix epoch)
    pub fn new(session_id: SessionId, now: u64) -> Self {
        Self {
            session_id,
            created_at: now,
            last_active_at: now,
            current_turn: 0,
            population: None,
            dietary_pattern: None,
            dose_info: None,
            known_conditions: Vec::new(),
            medications: Vec::new(),
            learned_at: BTreeMap::new(),
            superseded: Vec::new(),
            revisions: Vec::new(),
            prior_decisions: BTreeMap::new(),
            clarification_count: 0,
            asked_questions: Vec::new(),
            saturated_at_turn: None,
            decayed_at: None,
        }
    }

    /// Session identifier
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// When the session started
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// When the last turn was processed
    pub fn last_active_at(&self) -> u64 {
        self.last_active_at
    }

    /// Turn currently being (or last) processed
    pub fn current_turn(&self) -> u32 {
        self.current_turn
    }

    /// Known population
    pub fn population(&self) -> Option<&str> {
        self.population.as_deref()
    }

    /// Known dietary pattern
    pub fn dietary_pattern(&self) -> Option<&str> {
        self.dietary_pattern.as_deref()
    }

    /// Known dose
    pub fn dose_info(&self) -> Option<&str> {
        self.dose_info.as_deref()
    }

    /// Known conditions
    pub fn known_conditions(&self) -> &[String] {
        &self.known_conditions
    }

    /// Known medications
    pub fn medications(&self) -> &[String] {
        &self.medications
    }

    /// Current value of a field, `None` if never learned
    ///
    /// An empty list counts as never learned.
    pub fn value_of(&self, field: BeliefField) -> Option<FieldValue> {
        let scalar = |v: &Option<String>| v.clone().map(FieldValue::Scalar);
        let list = |v: &Vec<String>| (!v.is_empty()).then(|| FieldValue::List(v.clone()));
        match field {
            BeliefField::Population => scalar(&self.population),
            BeliefField::DietaryPattern => scalar(&self.dietary_pattern),
            BeliefField::DoseInfo => scalar(&self.dose_info),
            BeliefField::KnownConditions => list(&self.known_conditions),
            BeliefField::Medications => list(&self.medications),
        }
    }

    /// Turn in which a field was last written
    pub fn learned_at(&self, field: BeliefField) -> Option<u32> {
        self.learned_at.get(&field).copied()
    }

    /// Fields whose earlier value was contradicted, in order of first contradiction
    pub fn superseded(&self) -> &[BeliefField] {
        &self.superseded
    }

    /// Whether a field's earlier value was ever contradicted
    pub fn is_superseded(&self, field: BeliefField) -> bool {
        self.superseded.contains(&field)
    }

    /// Every revision applied, oldest first
    pub fn revisions(&self) -> &[BeliefRevision] {
        &self.revisions
    }

    /// Decision recorded for a claim
    pub fn prior_decision(&self, claim_id: &ClaimId) -> Option<&PriorDecision> {
        self.prior_decisions.get(claim_id)
    }

    /// All recorded decisions
    pub fn prior_decisions(&self) -> &BTreeMap<ClaimId, PriorDecision> {
        &self.prior_decisions
    }

    /// Clarifying questions asked so far
    pub fn clarification_count(&self) -> u32 {
        self.clarification_count
    }

    /// Clarifying questions asked, oldest first
    pub fn asked_questions(&self) -> &[String] {
        &self.asked_questions
    }

    /// Whether the clarification budget has been exhausted
    pub fn is_saturated(&self) -> bool {
        self.saturated_at_turn.is_some()
    }

    /// Turn in which saturation triggered
    pub fn saturated_at_turn(&self) -> Option<u32> {
        self.saturated_at_turn
    }

    /// What the applicability matcher sees of this user
    pub fn user_context(&self) -> UserContext {
        UserContext {
            population: self.population.clone(),
            dietary_context: self.dietary_pattern.clone(),
            dose_info: self.dose_info.clone(),
        }
    }

    /// Advance to `turn` at time `now`
    pub fn begin_turn(&mut self, turn: u32, now: u64) {
        self.current_turn = turn;
        self.last_active_at = self.last_active_at.max(now);
    }

    /// Record this turn's decision for a claim
    pub fn record_decision(&mut self, claim_id: ClaimId, prior: PriorDecision) {
        self.prior_decisions.insert(claim_id, prior);
    }

    /// Multiply every prior confidence by `factor` (clamped to [0, 1])
    pub fn decay_confidences(&mut self, factor: f64, now: u64) {
        let factor = factor.clamp(0.0, 1.0);
        for prior in self.prior_decisions.values_mut() {
            prior.confidence *= factor;
        }
        self.decayed_at = Some(now);
    }

    /// When confidences were last decayed
    pub fn decayed_at(&self) -> Option<u64> {
        self.decayed_at
    }

    /// Whether confidences were decayed after the last activity
    pub fn decayed_since_active(&self) -> bool {
        self.decayed_at.is_some_and(|at| at >= self.last_active_at)
    }

    /// Forget everything learned in this session
    ///
    /// The session id and creation time survive; the turn counter keeps
    /// running so turn stamps stay unique within the session.
    pub fn clear(&mut self, now: u64) {
        let turn = self.current_turn;
        *self = Self::new(self.session_id, self.created_at);
        self.current_turn = turn;
        self.last_active_at = now;
        info!(session_id = %self.session_id, "Belief state cleared");
    }

    /// Write a field, stamping the turn and logging the revision
    pub(crate) fn write_field(&mut self, revision: BeliefRevision) {
        let value = &revision.new_value;
        match revision.field {
            BeliefField::Population => self.population = Some(value.to_scalar()),
            BeliefField::DietaryPattern => self.dietary_pattern = Some(value.to_scalar()),
            BeliefField::DoseInfo => self.dose_info = Some(value.to_scalar()),
            BeliefField::KnownConditions => self.known_conditions = value.to_list(),
            BeliefField::Medications => self.medications = value.to_list(),
        }
        self.learned_at.insert(revision.field, revision.turn);
        self.revisions.push(revision);
    }

    pub(crate) fn mark_superseded(&mut self, field: BeliefField) {
        if !self.superseded.contains(&field) {
            self.superseded.push(field);
        }
    }

    pub(crate) fn record_question(&mut self, question: String) {
        self.clarification_count += 1;
        self.asked_questions.push(question);
    }

    pub(crate) fn mark_saturated(&mut self, turn: u32) {
        if self.saturated_at_turn.is_none() {
            self.saturated_at_turn = Some(turn);
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, BeliefError> {
        serde_json::to_string_pretty(self).map_err(|e| BeliefError::Serialization(e.to_string()))
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, BeliefError> {
        serde_json::from_str(json).map_err(|e| BeliefError::Serialization(e.to_string()))
    }
}
