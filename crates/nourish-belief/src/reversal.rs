//! Reversal explanations
//!
//! Every decision that is not STABLE carries a structured explanation: what
//! changed, why (the gate's own explanation, never invented), and the
//! before/after decisions. Nothing here generates free text beyond fixed
//! templates.

use crate::{BeliefField, BeliefRevision, BeliefState, FieldValue, RevisionKind};
use nourish_domain::{ChangeType, ClaimId, Decision, DecisionDelta, ReasonCode, RecommendationResult};
use serde::{Deserialize, Serialize};

/// Generic trigger used when no belief revision explains a change
pub const ADDITIONAL_CONTEXT: &str = "additional context was provided";

/// What triggered a decision change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "trigger", rename_all = "snake_case")]
pub enum ChangeTrigger {
    /// A belief revision
    Revision {
        /// Field revised
        field: BeliefField,
        /// Classification
        kind: RevisionKind,
        /// Value before
        old_value: Option<FieldValue>,
        /// Value after
        new_value: FieldValue,
        /// Turn the revision happened in
        turn: u32,
    },
    /// Nothing in the belief state changed
    AdditionalContext,
}

impl ChangeTrigger {
    fn from_revision(revision: &BeliefRevision) -> Self {
        ChangeTrigger::Revision {
            field: revision.field,
            kind: revision.kind,
            old_value: revision.old_value.clone(),
            new_value: revision.new_value.clone(),
            turn: revision.turn,
        }
    }

    /// One-line template rendering of the trigger
    pub fn describe(&self) -> String {
        match self {
            ChangeTrigger::Revision {
                field,
                kind,
                old_value: Some(old),
                new_value,
                turn,
            } => format!(
                "{} changed from {} to {} at turn {} ({})",
                field, old, new_value, turn, kind
            ),
            ChangeTrigger::Revision {
                field,
                kind,
                old_value: None,
                new_value,
                turn,
            } => format!("{} set to {} at turn {} ({})", field, new_value, turn, kind),
            ChangeTrigger::AdditionalContext => ADDITIONAL_CONTEXT.to_string(),
        }
    }
}

/// Structured explanation of a decision change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReversalExplanation {
    /// Claim whose decision changed
    pub claim_id: ClaimId,
    /// Classification
    pub change: ChangeType,
    /// Decision before
    pub before: Option<Decision>,
    /// Decision after
    pub after: Decision,
    /// What changed
    pub what_changed: ChangeTrigger,
    /// Reason code of the new decision
    pub reason: ReasonCode,
    /// The gate's explanation of the new decision
    pub why: String,
}

impl ReversalExplanation {
    /// Template rendering for display
    pub fn render(&self) -> String {
        let before = self.before.map(|d| d.as_str()).unwrap_or("none");
        format!(
            "{} -> {} because {}. {}",
            before,
            self.after,
            self.what_changed.describe(),
            self.why
        )
    }
}

/// Build the explanation for a delta, `None` when the decision is STABLE
///
/// Only revisions made after the prior decision are considered (for a new
/// decision, those of the current turn). Among them the most recent turn
/// wins, and within a turn a contradiction outranks a clarification, which
/// outranks an update.
pub fn explain(
    delta: &DecisionDelta,
    state: &BeliefState,
    result: &RecommendationResult,
) -> Option<ReversalExplanation> {
    if !delta.requires_explanation() {
        return None;
    }

    let since = state.prior_decision(&delta.claim_id).map(|p| p.turn);
    let current_turn = state.current_turn();
    let trigger = state
        .revisions()
        .iter()
        .filter(|r| match since {
            Some(prior_turn) => r.turn > prior_turn,
            None => r.turn == current_turn,
        })
        .max_by_key(|r| (r.turn, r.kind))
        .map(ChangeTrigger::from_revision)
        .unwrap_or(ChangeTrigger::AdditionalContext);

    Some(ReversalExplanation {
        claim_id: delta.claim_id.clone(),
        change: delta.change,
        before: delta.prior,
        after: delta.current,
        what_changed: trigger,
        reason: result.reason,
        why: result.explanation.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fixtures::{prior, state};
    use crate::{compare, revise, FieldUpdate};

    fn allow() -> RecommendationResult {
        RecommendationResult::new(
            Decision::Allow,
            ReasonCode::MechanismStrong,
            "The mechanism is well supported and applies to your situation.",
        )
    }

    #[test]
    fn test_stable_has_no_explanation() {
        let mut state = state();
        let claim = ClaimId::new("c1");
        state.record_decision(claim.clone(), prior(Decision::Allow, 1));

        let delta = compare(&state, &claim, Decision::Allow);
        assert!(explain(&delta, &state, &allow()).is_none());
    }

    #[test]
    fn test_upgrade_names_revision_and_reuses_gate_explanation() {
        let mut state = state();
        let claim = ClaimId::new("c1");
        state.begin_turn(1, 1_000);
        state.record_decision(claim.clone(), prior(Decision::RequireMoreContext, 1));

        state.begin_turn(2, 1_060);
        revise(&mut state, &FieldUpdate::DoseInfo("2g".to_string()), 2);

        let delta = compare(&state, &claim, Decision::Allow);
        let explanation = explain(&delta, &state, &allow()).unwrap();

        assert_eq!(explanation.change, ChangeType::Upgrade);
        assert_eq!(explanation.before, Some(Decision::RequireMoreContext));
        assert_eq!(explanation.after, Decision::Allow);
        assert_eq!(explanation.why, allow().explanation);
        assert!(matches!(
            explanation.what_changed,
            ChangeTrigger::Revision { field: BeliefField::DoseInfo, turn: 2, .. }
        ));
        assert!(explanation.render().contains("dose_info set to 2g at turn 2"));
    }

    #[test]
    fn test_contradiction_preferred_within_turn() {
        let mut state = state();
        let claim = ClaimId::new("c1");
        revise(&mut state, &FieldUpdate::Population("adult".to_string()), 1);
        state.record_decision(claim.clone(), prior(Decision::Allow, 1));

        state.begin_turn(3, 2_000);
        revise(&mut state, &FieldUpdate::Population("pregnant".to_string()), 3);
        revise(&mut state, &FieldUpdate::DoseInfo("1g".to_string()), 3);

        let delta = compare(&state, &claim, Decision::RequireMoreContext);
        let explanation = explain(&delta, &state, &allow()).unwrap();
        match explanation.what_changed {
            ChangeTrigger::Revision { field, kind, turn, .. } => {
                assert_eq!(field, BeliefField::Population);
                assert_eq!(kind, RevisionKind::Contradiction);
                assert_eq!(turn, 3);
            }
            other => panic!("Expected revision trigger, got {:?}", other),
        }
    }

    #[test]
    fn test_revisions_before_prior_decision_are_ignored() {
        let mut state = state();
        let claim = ClaimId::new("c1");
        revise(&mut state, &FieldUpdate::Population("adult".to_string()), 1);
        state.record_decision(claim.clone(), prior(Decision::Allow, 2));
        state.begin_turn(3, 2_000);

        let delta = compare(&state, &claim, Decision::Withhold);
        let explanation = explain(&delta, &state, &allow()).unwrap();
        assert_eq!(explanation.what_changed, ChangeTrigger::AdditionalContext);
        assert!(explanation.render().contains(ADDITIONAL_CONTEXT));
    }

    #[test]
    fn test_new_decision_is_explained() {
        let mut state = state();
        state.begin_turn(1, 1_000);
        let delta = compare(&state, &ClaimId::new("c1"), Decision::Allow);
        let explanation = explain(&delta, &state, &allow()).unwrap();
        assert_eq!(explanation.change, ChangeType::NewDecision);
        assert_eq!(explanation.before, None);
        assert!(explanation.render().starts_with("none -> allow"));
    }
}
