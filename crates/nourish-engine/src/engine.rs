//! Per-turn orchestration

use crate::questions::question_for;
use crate::{ClaimOutcome, ClarifyingQuestion, EngineConfig, EngineError, TurnInput, TurnOutcome};
use nourish_belief::{
    compare, explain, revise, BeliefState, PolicyRef, PriorDecision, QuestionVerdict, SaturationGuard,
};
use nourish_domain::{
    ChangeType, ClaimInput, EvidenceSet, ReasonCode, RecommendationResult, UserContext,
};
use nourish_gatekeeper::{GateInput, Gatekeeper};
use nourish_janitor::SessionResetPolicy;
use nourish_policy::{execute, EvidencePolicy, PolicyRegistry};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Runs the full trust cascade for one turn of one session
///
/// Holds only read-only services and the shared policy artifact, so a
/// single engine may serve any number of sessions. Callers serialize turns
/// within a session.
#[derive(Debug, Clone)]
pub struct TurnEngine {
    policy: Arc<EvidencePolicy>,
    gatekeeper: Gatekeeper,
    guard: SaturationGuard,
    reset: SessionResetPolicy,
    config: EngineConfig,
}

impl TurnEngine {
    /// Create an engine for `policy`
    ///
    /// # Errors
    /// Fails if the configuration is invalid or the policy does not pass
    /// its own integrity validation.
    pub fn new(policy: Arc<EvidencePolicy>, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate().map_err(EngineError::Config)?;
        policy.validate()?;

        info!(
            policy_id = policy.policy_id(),
            version = policy.version(),
            hash = policy.content_hash(),
            "Turn engine ready"
        );

        Ok(Self {
            gatekeeper: Gatekeeper::new(config.gatekeeper.clone())?,
            guard: SaturationGuard::new(config.saturation.clone()),
            reset: SessionResetPolicy::new(config.reset.clone())?,
            policy,
            config,
        })
    }

    /// Create an engine for a registered policy selected by id and version
    pub fn from_registry(
        registry: &PolicyRegistry,
        policy_id: &str,
        version: &str,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        let policy = registry.get(policy_id, version)?;
        Self::new(policy, config)
    }

    /// The active policy
    pub fn policy(&self) -> &EvidencePolicy {
        &self.policy
    }

    /// The active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Process one turn against a session's belief state
    ///
    /// The cascade runs on a copy of `state`; the copy replaces `state`
    /// only when every claim has been processed. On error `state` is left
    /// exactly as it was.
    pub fn process_turn(&self, state: &mut BeliefState, input: &TurnInput) -> Result<TurnOutcome, EngineError> {
        if input.turn <= state.current_turn() {
            return Err(EngineError::OutOfOrderTurn {
                turn: input.turn,
                current: state.current_turn(),
            });
        }

        let mut working = state.clone();
        let reset = self.reset.reset(&mut working, input.now, input.utterance.as_deref());
        working.begin_turn(input.turn, input.now);

        let revisions: Vec<_> = input
            .context
            .iter()
            .filter_map(|update| revise(&mut working, update, input.turn))
            .collect();

        let context = working.user_context();
        let mut claims = Vec::with_capacity(input.claims.len());
        for claim in &input.claims {
            claims.push(self.evaluate_claim(&mut working, claim, &context, input.turn)?);
        }

        let question = self.clarify(&mut working, &input.claims, &claims, input.turn);

        info!(
            session_id = %working.session_id(),
            turn = input.turn,
            reset = %reset,
            revisions = revisions.len(),
            claims = claims.len(),
            asked = question.is_some(),
            saturated = working.is_saturated(),
            "Turn processed"
        );

        let outcome = TurnOutcome {
            session_id: working.session_id(),
            turn: input.turn,
            reset,
            revisions,
            claims,
            question,
            saturated: working.is_saturated(),
        };
        *state = working;
        Ok(outcome)
    }

    fn evaluate_claim(
        &self,
        state: &mut BeliefState,
        claim: &ClaimInput,
        context: &UserContext,
        turn: u32,
    ) -> Result<ClaimOutcome, EngineError> {
        let evidence = EvidenceSet::freeze(claim.claim_id.clone(), claim.evidence.clone())?;
        if claim.registry_hit && evidence.is_empty() {
            warn!(claim_id = %claim.claim_id, "Registry hit without evidence");
            return Err(EngineError::RegistryHitWithoutEvidence(claim.claim_id.to_string()));
        }

        let breakdown = execute(&claim.claim_id, &evidence, &self.policy)?;
        let coverage_score = claim
            .coverage_score
            .unwrap_or(breakdown.final_score)
            .clamp(0.0, 1.0);

        let gate = self.gatekeeper.review(
            GateInput {
                kind: claim.kind,
                mechanism: &claim.mechanism,
                compounds: &claim.compounds,
                profile: &claim.applicability,
                coverage_score,
            },
            context,
        );

        let effective_confidence = breakdown.final_score.min(gate.chain.weakest_link_confidence);
        let strength = self.config.strength_for(effective_confidence);

        let mut recommendation = gate.recommendation.clone();
        let mut delta = compare(state, &claim.claim_id, recommendation.decision);
        let mut held = false;

        if delta.change == ChangeType::Upgrade && !self.guard.permits_upgrade(state, strength) {
            if let Some(prior) = state.prior_decision(&claim.claim_id) {
                warn!(
                    claim_id = %claim.claim_id,
                    prior = %prior.decision,
                    proposed = %recommendation.decision,
                    strength = %strength,
                    "Saturation hold"
                );
                recommendation = RecommendationResult::new(
                    prior.decision,
                    ReasonCode::SaturationHold,
                    format!(
                        "Holding at {} until STRONG evidence is available (current evidence is {}).",
                        prior.decision, strength
                    ),
                );
                delta = compare(state, &claim.claim_id, recommendation.decision);
                held = true;
            }
        }

        let explanation = explain(&delta, state, &recommendation);

        let decided_at = match (delta.change, state.prior_decision(&claim.claim_id)) {
            (ChangeType::Stable, Some(prior)) => prior.turn,
            _ => turn,
        };
        state.record_decision(
            claim.claim_id.clone(),
            PriorDecision {
                decision: recommendation.decision,
                confidence: effective_confidence,
                reason: recommendation.reason,
                policy: PolicyRef {
                    policy_id: breakdown.policy_id.clone(),
                    version: breakdown.policy_version.clone(),
                    content_hash: breakdown.policy_hash.clone(),
                },
                turn: decided_at,
            },
        );

        info!(
            claim_id = %claim.claim_id,
            turn,
            score = breakdown.final_score,
            tier = %breakdown.tier,
            decision = %recommendation.decision,
            reason = %recommendation.reason,
            change = ?delta.change,
            "Claim decided"
        );

        Ok(ClaimOutcome {
            claim_id: claim.claim_id.clone(),
            breakdown,
            gate,
            effective_confidence,
            strength,
            recommendation,
            held,
            delta,
            explanation,
        })
    }

    /// Propose at most one clarifying question through the saturation guard
    fn clarify(
        &self,
        state: &mut BeliefState,
        inputs: &[ClaimInput],
        outcomes: &[ClaimOutcome],
        turn: u32,
    ) -> Option<ClarifyingQuestion> {
        let candidates = inputs
            .iter()
            .zip(outcomes)
            .filter(|(_, outcome)| !outcome.held)
            .filter_map(|(input, outcome)| question_for(input, &outcome.gate));

        let mut asked = None;
        for question in candidates {
            match self.guard.propose_question(state, &question.text) {
                QuestionVerdict::Asked => {
                    asked = Some(question);
                    break;
                }
                QuestionVerdict::Repeated { .. } => {
                    debug!(claim_id = %question.claim_id, "Trying next clarifying question");
                }
                QuestionVerdict::BudgetExhausted => break,
            }
        }

        // The turn that spends the last question saturates the session
        if self.guard.should_stop_asking(state) {
            self.guard.trigger_saturation(state, turn);
        }
        asked
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::fixtures::{omega3_claim, policy};
    use nourish_belief::FieldUpdate;
    use nourish_domain::{ApplicabilityProfile, SessionId};
    use proptest::prelude::*;

    fn update() -> impl Strategy<Value = FieldUpdate> {
        prop_oneof![
            prop::sample::select(vec!["general", "pregnant", "adult"])
                .prop_map(|p| FieldUpdate::Population(p.to_string())),
            prop::sample::select(vec!["1g", "2g"]).prop_map(|d| FieldUpdate::DoseInfo(d.to_string())),
            prop::sample::select(vec!["vegan", "omnivore"])
                .prop_map(|d| FieldUpdate::DietaryPattern(d.to_string())),
        ]
    }

    fn claim() -> ClaimInput {
        let mut claim = omega3_claim();
        claim.applicability = ApplicabilityProfile {
            population: Some("general".to_string()),
            dietary_context: None,
            dose: Some("2g".to_string()),
        };
        claim
    }

    proptest! {
        #[test]
        fn every_change_is_explained(turns in prop::collection::vec(prop::option::of(update()), 1..8)) {
            let engine = TurnEngine::new(policy(), EngineConfig::default()).unwrap();
            let mut state = BeliefState::new(SessionId::from_value(5), 0);

            for (i, update) in turns.into_iter().enumerate() {
                let turn = i as u32 + 1;
                let mut input = TurnInput::new(turn, u64::from(turn) * 10).with_claim(claim());
                if let Some(update) = update {
                    input = input.with_context(update);
                }
                let outcome = engine.process_turn(&mut state, &input).unwrap();
                for claim in &outcome.claims {
                    prop_assert_eq!(claim.explanation.is_some(), claim.delta.change != ChangeType::Stable);
                    prop_assert!(claim.effective_confidence <= claim.breakdown.final_score);
                }
                prop_assert!(state.clarification_count() <= engine.config().saturation.max_clarifications);
            }
        }

        #[test]
        fn turns_are_reproducible(updates in prop::collection::vec(update(), 0..4)) {
            let engine = TurnEngine::new(policy(), EngineConfig::default()).unwrap();
            let mut input = TurnInput::new(1, 10).with_claim(claim());
            input.context = updates;

            let mut a = BeliefState::new(SessionId::from_value(6), 0);
            let mut b = a.clone();
            let first = engine.process_turn(&mut a, &input).unwrap();
            let second = engine.process_turn(&mut b, &input).unwrap();
            prop_assert_eq!(first, second);
            prop_assert_eq!(a, b);
        }
    }
}
