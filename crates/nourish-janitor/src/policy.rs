//! Session reset policy
//!
//! Decides, from the inactivity gap and the user's latest utterance, whether
//! a session's prior confidences should decay or its belief state be
//! cleared. A decay for inactivity happens once per idle period; a topic
//! shift decays every time it is stated.

use crate::{JanitorError, ResetConfig};
use nourish_belief::BeliefState;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// What the reset policy recommends for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetAction {
    /// Leave the session as it is
    None,
    /// Multiply prior confidences by the decay factor
    Decay,
    /// Forget the session's belief state
    Clear,
}

impl ResetAction {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ResetAction::None => "none",
            ResetAction::Decay => "decay",
            ResetAction::Clear => "clear",
        }
    }
}

impl fmt::Display for ResetAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Words that may precede a topic-shift phrase at the start of a clause
const LEAD_INS: &[&str] = &[
    "ok", "okay", "alright", "so", "now", "well", "anyway", "actually", "and", "but", "um",
];

/// Decides and applies session resets
#[derive(Debug, Clone)]
pub struct SessionResetPolicy {
    config: ResetConfig,
    phrases: Vec<Vec<String>>,
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

impl SessionResetPolicy {
    /// Create a policy after validating its configuration
    pub fn new(config: ResetConfig) -> Result<Self, JanitorError> {
        config.validate().map_err(JanitorError::Config)?;
        Ok(Self::build(config))
    }

    fn build(config: ResetConfig) -> Self {
        let phrases = config
            .topic_shift_phrases
            .iter()
            .map(|p| words(p))
            .filter(|p| !p.is_empty())
            .collect();
        Self { config, phrases }
    }

    /// Get the configuration
    pub fn config(&self) -> &ResetConfig {
        &self.config
    }

    /// Whether some clause of the utterance opens with a topic-shift phrase
    ///
    /// Phrases match whole words at the start of a clause, after any lead-in
    /// words such as "ok" or "anyway". A phrase in the middle of a sentence
    /// ("can I eat something else with it?") is not a shift.
    pub fn is_topic_shift(&self, utterance: &str) -> bool {
        let normalized = utterance.replace('\u{2019}', "'");
        normalized
            .split(|c: char| matches!(c, '.' | ',' | '!' | '?' | ';' | ':' | '\n'))
            .any(|clause| {
                let words = words(clause);
                let start = words
                    .iter()
                    .take_while(|w| LEAD_INS.contains(&w.as_str()))
                    .count();
                let rest = &words[start..];
                self.phrases.iter().any(|phrase| rest.starts_with(phrase))
            })
    }

    /// Recommend a reset for `state` at time `now`
    pub fn evaluate(&self, state: &BeliefState, now: u64, utterance: Option<&str>) -> ResetAction {
        let idle = now.saturating_sub(state.last_active_at());

        let action = if idle >= self.config.clear_after_secs {
            ResetAction::Clear
        } else if utterance.is_some_and(|u| self.is_topic_shift(u)) {
            ResetAction::Decay
        } else if idle >= self.config.decay_after_secs && !state.decayed_since_active() {
            ResetAction::Decay
        } else {
            ResetAction::None
        };

        debug!(
            session_id = %state.session_id(),
            idle_secs = idle,
            action = %action,
            "Evaluated session reset"
        );
        action
    }

    /// Apply a recommended action to `state`
    pub fn apply(&self, state: &mut BeliefState, action: ResetAction, now: u64) {
        match action {
            ResetAction::None => {}
            ResetAction::Decay => {
                state.decay_confidences(self.config.decay_factor, now);
                info!(
                    session_id = %state.session_id(),
                    factor = self.config.decay_factor,
                    "Decayed prior confidences"
                );
            }
            ResetAction::Clear => state.clear(now),
        }
    }

    /// Evaluate and apply in one step, returning the action taken
    pub fn reset(&self, state: &mut BeliefState, now: u64, utterance: Option<&str>) -> ResetAction {
        let action = self.evaluate(state, now, utterance);
        self.apply(state, action, now);
        action
    }
}

impl Default for SessionResetPolicy {
    fn default() -> Self {
        Self::build(ResetConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nourish_belief::{PolicyRef, PriorDecision};
    use nourish_domain::{ClaimId, Decision, ReasonCode, SessionId};

    fn state_with_prior(now: u64) -> BeliefState {
        let mut state = BeliefState::new(SessionId::from_value(3), now);
        state.record_decision(
            ClaimId::new("c1"),
            PriorDecision {
                decision: Decision::Allow,
                confidence: 0.8,
                reason: ReasonCode::MechanismStrong,
                policy: PolicyRef {
                    policy_id: "nutrition-evidence".to_string(),
                    version: "1.0.0".to_string(),
                    content_hash: "cd".repeat(32),
                },
                turn: 1,
            },
        );
        state
    }

    fn confidence(state: &BeliefState) -> f64 {
        state.prior_decision(&ClaimId::new("c1")).unwrap().confidence
    }

    #[test]
    fn test_short_gap_leaves_session() {
        let policy = SessionResetPolicy::default();
        let state = state_with_prior(1_000);
        assert_eq!(policy.evaluate(&state, 1_000 + 1_799, None), ResetAction::None);
    }

    #[test]
    fn test_decay_after_gap() {
        let policy = SessionResetPolicy::default();
        let mut state = state_with_prior(1_000);

        assert_eq!(policy.reset(&mut state, 1_000 + 1_800, None), ResetAction::Decay);
        assert_eq!(confidence(&state), 0.4);
    }

    #[test]
    fn test_idle_decay_happens_once_per_idle_period() {
        let policy = SessionResetPolicy::default();
        let mut state = state_with_prior(1_000);

        policy.reset(&mut state, 3_000, None);
        assert_eq!(policy.reset(&mut state, 4_000, None), ResetAction::None);
        assert_eq!(confidence(&state), 0.4);

        state.begin_turn(2, 4_000);
        assert_eq!(policy.reset(&mut state, 6_000, None), ResetAction::Decay);
        assert_eq!(confidence(&state), 0.2);
    }

    #[test]
    fn test_topic_shift_decays_without_gap() {
        let policy = SessionResetPolicy::default();
        let mut state = state_with_prior(1_000);

        let action = policy.reset(&mut state, 1_010, Some("OK, New Topic: is coffee fine?"));
        assert_eq!(action, ResetAction::Decay);
        assert_eq!(confidence(&state), 0.4);

        assert_eq!(policy.evaluate(&state, 1_020, Some("is coffee fine?")), ResetAction::None);
    }

    #[test]
    fn test_topic_shift_needs_phrase_at_clause_start() {
        let policy = SessionResetPolicy::default();

        assert!(policy.is_topic_shift("Anyway, something else: is coffee fine?"));
        assert!(policy.is_topic_shift("Let\u{2019}s start over."));
        assert!(policy.is_topic_shift("Thanks. Different question, what about iron?"));

        assert!(!policy.is_topic_shift("Should I eat something else with it?"));
        assert!(!policy.is_topic_shift("Is that a new topical cream?"));
        assert!(!policy.is_topic_shift("I had to start over with my diet last year"));
    }

    #[test]
    fn test_benign_question_does_not_decay() {
        let policy = SessionResetPolicy::default();
        let mut state = state_with_prior(1_000);

        let action = policy.reset(&mut state, 1_010, Some("Should I eat something else with it?"));
        assert_eq!(action, ResetAction::None);
        assert_eq!(confidence(&state), 0.8);
    }

    #[test]
    fn test_clear_after_long_gap() {
        let policy = SessionResetPolicy::default();
        let mut state = state_with_prior(1_000);

        let action = policy.reset(&mut state, 1_000 + 86_400, Some("new topic"));
        assert_eq!(action, ResetAction::Clear);
        assert!(state.prior_decisions().is_empty());
        assert_eq!(state.last_active_at(), 87_400);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ResetConfig {
            decay_factor: -0.1,
            ..ResetConfig::default()
        };
        assert!(matches!(SessionResetPolicy::new(config), Err(JanitorError::Config(_))));
    }

    #[test]
    fn test_action_display() {
        assert_eq!(ResetAction::Decay.to_string(), "decay");
        assert_eq!(serde_json::to_string(&ResetAction::Clear).unwrap(), "\"clear\"");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use nourish_belief::{PolicyRef, PriorDecision};
    use nourish_domain::{ClaimId, Decision, ReasonCode, SessionId};
    use proptest::prelude::*;

    fn state_with(confidences: &[f64]) -> BeliefState {
        let mut state = BeliefState::new(SessionId::from_value(9), 0);
        for (i, confidence) in confidences.iter().enumerate() {
            state.record_decision(
                ClaimId::new(format!("c{}", i)),
                PriorDecision {
                    decision: Decision::RequireMoreContext,
                    confidence: *confidence,
                    reason: ReasonCode::InsufficientContext,
                    policy: PolicyRef {
                        policy_id: "p".to_string(),
                        version: "1.0.0".to_string(),
                        content_hash: String::new(),
                    },
                    turn: 1,
                },
            );
        }
        state
    }

    proptest! {
        #[test]
        fn decay_never_raises_confidence(
            confidences in prop::collection::vec(0.0f64..=1.0, 1..8),
            factor in 0.0f64..=1.0,
            gap in 1_800u64..86_400,
        ) {
            let config = ResetConfig { decay_factor: factor, ..ResetConfig::default() };
            let policy = SessionResetPolicy::new(config).unwrap();
            let mut state = state_with(&confidences);

            prop_assert_eq!(policy.reset(&mut state, gap, None), ResetAction::Decay);
            for (i, before) in confidences.iter().enumerate() {
                let after = state.prior_decision(&ClaimId::new(format!("c{}", i))).unwrap().confidence;
                prop_assert!(after <= *before);
                prop_assert!(after >= 0.0);
            }
        }

        #[test]
        fn longer_gaps_never_reset_less(gap_a in 0u64..200_000, gap_b in 0u64..200_000) {
            let policy = SessionResetPolicy::default();
            let state = state_with(&[0.5]);
            let rank = |a: ResetAction| match a {
                ResetAction::None => 0,
                ResetAction::Decay => 1,
                ResetAction::Clear => 2,
            };
            let (short, long) = (gap_a.min(gap_b), gap_a.max(gap_b));
            prop_assert!(rank(policy.evaluate(&state, short, None)) <= rank(policy.evaluate(&state, long, None)));
        }
    }
}
