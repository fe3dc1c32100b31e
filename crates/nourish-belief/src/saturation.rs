//! Context saturation guard
//!
//! Bounds how many clarifying questions a session may ask and refuses
//! questions that repeat an earlier one in different words. Once saturated,
//! a decision may only move back up toward ALLOW on STRONG evidence.

use crate::BeliefState;
use nourish_domain::EvidenceStrength;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Configuration for the saturation guard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaturationConfig {
    /// Clarifying questions allowed per session
    /// Default: 2
    pub max_clarifications: u32,

    /// Jaccard similarity above which a question counts as a repeat
    /// Default: 0.6
    pub similarity_threshold: f64,

    /// Words ignored when comparing questions
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,
}

fn default_stop_words() -> Vec<String> {
    [
        "a", "an", "and", "any", "are", "as", "at", "be", "can", "could", "do", "does", "for", "how",
        "i", "if", "in", "is", "it", "me", "much", "of", "on", "or", "please", "tell", "that", "the",
        "to", "what", "which", "would", "you", "your",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for SaturationConfig {
    fn default() -> Self {
        Self {
            max_clarifications: 2,
            similarity_threshold: 0.6,
            stop_words: default_stop_words(),
        }
    }
}

impl SaturationConfig {
    /// Strict preset: a single clarifying question
    pub fn strict() -> Self {
        Self {
            max_clarifications: 1,
            similarity_threshold: 0.5,
            ..Self::default()
        }
    }

    /// Lenient preset: more questions, only near-verbatim repeats blocked
    pub fn lenient() -> Self {
        Self {
            max_clarifications: 4,
            similarity_threshold: 0.8,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err("similarity_threshold must be within [0, 1]".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

/// Outcome of proposing a clarifying question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum QuestionVerdict {
    /// The question was recorded and may be asked
    Asked,
    /// The clarification budget is spent
    BudgetExhausted,
    /// Too close to a question already asked
    Repeated {
        /// Earlier question it repeats
        earlier: String,
        /// Jaccard similarity of the two
        similarity: f64,
    },
}

/// Enforces the clarification budget and blocks repeated questions
#[derive(Debug, Clone)]
pub struct SaturationGuard {
    config: SaturationConfig,
    stop_words: BTreeSet<String>,
}

impl SaturationGuard {
    /// Create a guard
    pub fn new(config: SaturationConfig) -> Self {
        let stop_words = config.stop_words.iter().map(|w| w.to_lowercase()).collect();
        Self { config, stop_words }
    }

    /// The active configuration
    pub fn config(&self) -> &SaturationConfig {
        &self.config
    }

    /// Whether no further clarifying question may be asked
    pub fn should_stop_asking(&self, state: &BeliefState) -> bool {
        state.is_saturated() || state.clarification_count() >= self.config.max_clarifications
    }

    /// Content words of a question
    pub fn content_words(&self, text: &str) -> BTreeSet<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .filter(|w| !self.stop_words.contains(w))
            .collect()
    }

    /// Jaccard similarity of two questions' content words
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        let a = self.content_words(a);
        let b = self.content_words(b);
        let union = a.union(&b).count();
        if union == 0 {
            return 1.0;
        }
        a.intersection(&b).count() as f64 / union as f64
    }

    /// Check a question without recording it
    pub fn check_question(&self, state: &BeliefState, question: &str) -> QuestionVerdict {
        if self.should_stop_asking(state) {
            return QuestionVerdict::BudgetExhausted;
        }

        let repeat = state
            .asked_questions()
            .iter()
            .map(|earlier| (earlier, self.similarity(earlier, question)))
            .filter(|(_, similarity)| *similarity > self.config.similarity_threshold)
            .max_by(|a, b| a.1.total_cmp(&b.1));

        match repeat {
            Some((earlier, similarity)) => QuestionVerdict::Repeated {
                earlier: earlier.clone(),
                similarity,
            },
            None => QuestionVerdict::Asked,
        }
    }

    /// Propose a question, recording it if it may be asked
    pub fn propose_question(&self, state: &mut BeliefState, question: &str) -> QuestionVerdict {
        let verdict = self.check_question(state, question);
        match &verdict {
            QuestionVerdict::Asked => {
                state.record_question(question.to_string());
                info!(
                    session_id = %state.session_id(),
                    count = state.clarification_count(),
                    "Clarifying question asked"
                );
            }
            QuestionVerdict::BudgetExhausted => {
                warn!(session_id = %state.session_id(), "Clarification budget exhausted");
            }
            QuestionVerdict::Repeated { similarity, .. } => {
                warn!(
                    session_id = %state.session_id(),
                    similarity,
                    "Blocked repeated clarifying question"
                );
            }
        }
        verdict
    }

    /// Mark the session saturated as of `turn`
    pub fn trigger_saturation(&self, state: &mut BeliefState, turn: u32) {
        if !state.is_saturated() {
            warn!(session_id = %state.session_id(), turn, "Context saturation triggered");
        }
        state.mark_saturated(turn);
    }

    /// Whether a decision may move up the hierarchy given the evidence strength
    ///
    /// A spent clarification budget counts as saturation even before it has
    /// been marked on the state.
    pub fn permits_upgrade(&self, state: &BeliefState, strength: EvidenceStrength) -> bool {
        !self.should_stop_asking(state) || strength == EvidenceStrength::Strong
    }
}

impl Default for SaturationGuard {
    fn default() -> Self {
        Self::new(SaturationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fixtures::state;

    #[test]
    fn test_config_toml_roundtrip() {
        let config = SaturationConfig::strict();
        let parsed = SaturationConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, parsed);

        let partial = SaturationConfig::from_toml("max_clarifications = 3\nsimilarity_threshold = 0.7").unwrap();
        assert_eq!(partial.stop_words, SaturationConfig::default().stop_words);
        assert!(SaturationConfig::from_toml("max_clarifications = \"two\"").is_err());
    }

    #[test]
    fn test_budget_of_two() {
        let guard = SaturationGuard::default();
        let mut state = state();

        assert_eq!(guard.propose_question(&mut state, "What population are you in?"), QuestionVerdict::Asked);
        assert!(!guard.should_stop_asking(&state));
        assert_eq!(guard.propose_question(&mut state, "What dose do you take?"), QuestionVerdict::Asked);
        assert!(guard.should_stop_asking(&state));
        assert_eq!(
            guard.propose_question(&mut state, "Do you follow a particular diet?"),
            QuestionVerdict::BudgetExhausted
        );
        assert_eq!(state.clarification_count(), 2);
    }

    #[test]
    fn test_repeated_question_blocked() {
        let guard = SaturationGuard::default();
        let mut state = state();
        guard.propose_question(&mut state, "What dose of fish oil do you take daily?");

        let verdict = guard.propose_question(&mut state, "How much fish oil do you take daily?");
        assert!(matches!(verdict, QuestionVerdict::Repeated { .. }));
        assert_eq!(state.clarification_count(), 1);
    }

    #[test]
    fn test_distinct_question_allowed() {
        let guard = SaturationGuard::default();
        let mut state = state();
        guard.propose_question(&mut state, "What dose of fish oil do you take daily?");
        assert_eq!(
            guard.propose_question(&mut state, "Are you pregnant or breastfeeding?"),
            QuestionVerdict::Asked
        );
    }

    #[test]
    fn test_similarity_ignores_stop_words_and_case() {
        let guard = SaturationGuard::default();
        assert_eq!(guard.similarity("What is your DOSE?", "dose"), 1.0);
        assert_eq!(guard.similarity("vitamin d dose", "iron intake"), 0.0);
        assert_eq!(guard.similarity("fish oil dose", "fish oil brand"), 0.5);
    }

    #[test]
    fn test_saturation_gates_upgrades() {
        let guard = SaturationGuard::default();
        let mut state = state();
        assert!(guard.permits_upgrade(&state, EvidenceStrength::Weak));

        guard.trigger_saturation(&mut state, 3);
        assert!(state.is_saturated());
        assert_eq!(state.saturated_at_turn(), Some(3));
        assert!(guard.should_stop_asking(&state));
        assert!(!guard.permits_upgrade(&state, EvidenceStrength::Weak));
        assert!(!guard.permits_upgrade(&state, EvidenceStrength::Moderate));
        assert!(guard.permits_upgrade(&state, EvidenceStrength::Strong));
    }

    #[test]
    fn test_spent_budget_gates_upgrades_before_marking() {
        let guard = SaturationGuard::default();
        let mut state = state();
        guard.propose_question(&mut state, "What population are you in?");
        guard.propose_question(&mut state, "What dose do you take?");

        assert!(!state.is_saturated());
        assert!(!guard.permits_upgrade(&state, EvidenceStrength::Moderate));
        assert!(guard.permits_upgrade(&state, EvidenceStrength::Strong));
    }

    #[test]
    fn test_saturation_turn_is_sticky() {
        let guard = SaturationGuard::default();
        let mut state = state();
        guard.trigger_saturation(&mut state, 3);
        guard.trigger_saturation(&mut state, 5);
        assert_eq!(state.saturated_at_turn(), Some(3));
    }

    #[test]
    fn test_config_presets() {
        assert!(SaturationConfig::default().validate().is_ok());
        assert_eq!(SaturationConfig::strict().max_clarifications, 1);
        assert_eq!(SaturationConfig::lenient().max_clarifications, 4);

        let mut config = SaturationConfig::default();
        config.similarity_threshold = -0.1;
        assert!(config.validate().is_err());
    }
}
