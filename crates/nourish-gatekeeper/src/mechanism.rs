//! Mechanism chain validation
//!
//! Rules are checked in a fixed order and the chain is invalid at the first
//! violation:
//!
//! 1. the chain is non-empty and every step confidence is within [0, 1]
//! 2. the first step is a compound
//! 3. every step cites a source its type may rely on
//! 4. every adjacent pair is an allowed transition
//! 5. the chain ends in physiology or an outcome
//!
//! The weakest link (minimum step confidence) is reported for valid and
//! invalid chains alike.

use nourish_domain::{BreakReason, MechanismChain, MechanismStep, SourceKind, StepType};
use tracing::debug;

/// Source kinds a step of the given type may cite
///
/// Compounds are grounded in chemical and nutrient databases only; a health
/// outcome can never be backed by a database lookup.
pub fn allowed_sources(step_type: StepType) -> &'static [SourceKind] {
    match step_type {
        StepType::Compound => &[SourceKind::ChemicalDatabase, SourceKind::NutrientDatabase],
        StepType::Interaction | StepType::Physiology => {
            &[SourceKind::PeerReviewedLiterature, SourceKind::SystematicReview]
        }
        StepType::Outcome => &[
            SourceKind::PeerReviewedLiterature,
            SourceKind::SystematicReview,
            SourceKind::MechanisticInference,
        ],
    }
}

/// Step types allowed to follow `from`
pub fn allowed_successors(from: StepType) -> &'static [StepType] {
    match from {
        StepType::Compound => &[StepType::Interaction, StepType::Physiology],
        StepType::Interaction => &[StepType::Physiology, StepType::Outcome],
        StepType::Physiology => &[StepType::Outcome, StepType::Physiology],
        StepType::Outcome => &[],
    }
}

/// Validate a proposed causal chain
pub fn validate_chain(steps: Vec<MechanismStep>) -> MechanismChain {
    let weakest_link_confidence = steps
        .iter()
        .map(|s| s.confidence)
        .reduce(f64::min)
        .unwrap_or(0.0);

    let break_reason = find_break(&steps);
    if let Some(reason) = &break_reason {
        debug!(steps = steps.len(), reason = %reason, "Mechanism chain invalid");
    }

    MechanismChain {
        valid: break_reason.is_none(),
        weakest_link_confidence,
        break_reason,
        steps,
    }
}

fn find_break(steps: &[MechanismStep]) -> Option<BreakReason> {
    let Some(first) = steps.first() else {
        return Some(BreakReason::EmptyChain);
    };

    if let Some((index, step)) = steps
        .iter()
        .enumerate()
        .find(|(_, s)| !(0.0..=1.0).contains(&s.confidence))
    {
        return Some(BreakReason::ConfidenceOutOfRange {
            index,
            confidence: step.confidence,
        });
    }

    if first.step_type != StepType::Compound {
        return Some(BreakReason::FirstStepNotCompound {
            found: first.step_type,
        });
    }

    for (index, step) in steps.iter().enumerate() {
        if !allowed_sources(step.step_type).contains(&step.source) {
            return Some(BreakReason::DisallowedSource {
                index,
                step_type: step.step_type,
                source: step.source,
            });
        }
    }

    for (index, pair) in steps.windows(2).enumerate() {
        let (from, to) = (pair[0].step_type, pair[1].step_type);
        if from == StepType::Compound && to == StepType::Outcome {
            return Some(BreakReason::MissingInteractionOrPhysiology { index: index + 1 });
        }
        if !allowed_successors(from).contains(&to) {
            return Some(BreakReason::InvalidTransition {
                index: index + 1,
                from,
                to,
            });
        }
    }

    steps
        .last()
        .map(|s| s.step_type)
        .filter(|last| !matches!(last, StepType::Physiology | StepType::Outcome))
        .map(|last| BreakReason::NonTerminalEnd { last })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(step_type: StepType, source: SourceKind, confidence: f64) -> MechanismStep {
        MechanismStep::new(step_type, format!("{} step", step_type), source, confidence)
    }

    fn full_chain(confidences: [f64; 4]) -> Vec<MechanismStep> {
        vec![
            step(StepType::Compound, SourceKind::ChemicalDatabase, confidences[0]),
            step(StepType::Interaction, SourceKind::PeerReviewedLiterature, confidences[1]),
            step(StepType::Physiology, SourceKind::SystematicReview, confidences[2]),
            step(StepType::Outcome, SourceKind::MechanisticInference, confidences[3]),
        ]
    }

    #[test]
    fn test_full_chain_is_valid() {
        let chain = validate_chain(full_chain([0.9, 0.8, 0.85, 0.8]));
        assert!(chain.valid);
        assert_eq!(chain.weakest_link_confidence, 0.8);
        assert_eq!(chain.break_reason, None);
    }

    #[test]
    fn test_weakest_link_is_minimum_not_average() {
        let chain = validate_chain(full_chain([0.95, 0.2, 0.95, 0.95]));
        assert!(chain.valid);
        assert_eq!(chain.weakest_link_confidence, 0.2);
    }

    #[test]
    fn test_empty_chain_is_invalid() {
        let chain = validate_chain(vec![]);
        assert!(!chain.valid);
        assert_eq!(chain.weakest_link_confidence, 0.0);
        assert_eq!(chain.break_reason, Some(BreakReason::EmptyChain));
    }

    #[test]
    fn test_compound_to_outcome_is_missing_link() {
        let chain = validate_chain(vec![
            step(StepType::Compound, SourceKind::NutrientDatabase, 0.9),
            step(StepType::Outcome, SourceKind::PeerReviewedLiterature, 0.7),
        ]);
        assert!(!chain.valid);
        let reason = chain.break_reason.unwrap();
        assert_eq!(reason, BreakReason::MissingInteractionOrPhysiology { index: 1 });
        assert!(reason.to_string().contains("missing interaction/physiology"));
    }

    #[test]
    fn test_first_step_must_be_compound() {
        let chain = validate_chain(vec![
            step(StepType::Interaction, SourceKind::PeerReviewedLiterature, 0.9),
            step(StepType::Physiology, SourceKind::PeerReviewedLiterature, 0.9),
        ]);
        assert_eq!(
            chain.break_reason,
            Some(BreakReason::FirstStepNotCompound { found: StepType::Interaction })
        );
    }

    #[test]
    fn test_database_cannot_back_outcome() {
        let mut steps = full_chain([0.9; 4]);
        steps[3].source = SourceKind::ChemicalDatabase;
        let chain = validate_chain(steps);
        assert_eq!(
            chain.break_reason,
            Some(BreakReason::DisallowedSource {
                index: 3,
                step_type: StepType::Outcome,
                source: SourceKind::ChemicalDatabase,
            })
        );
    }

    #[test]
    fn test_compound_needs_hard_source() {
        let mut steps = full_chain([0.9; 4]);
        steps[0].source = SourceKind::MechanisticInference;
        let chain = validate_chain(steps);
        assert!(matches!(chain.break_reason, Some(BreakReason::DisallowedSource { index: 0, .. })));
    }

    #[test]
    fn test_source_rule_precedes_transition_rule() {
        let chain = validate_chain(vec![
            step(StepType::Compound, SourceKind::ChemicalDatabase, 0.9),
            step(StepType::Outcome, SourceKind::NutrientDatabase, 0.9),
        ]);
        assert!(matches!(chain.break_reason, Some(BreakReason::DisallowedSource { index: 1, .. })));
    }

    #[test]
    fn test_nothing_follows_outcome() {
        let mut steps = full_chain([0.9; 4]);
        steps.push(step(StepType::Physiology, SourceKind::PeerReviewedLiterature, 0.9));
        let chain = validate_chain(steps);
        assert_eq!(
            chain.break_reason,
            Some(BreakReason::InvalidTransition {
                index: 4,
                from: StepType::Outcome,
                to: StepType::Physiology,
            })
        );
    }

    #[test]
    fn test_physiology_may_repeat_and_terminate() {
        let chain = validate_chain(vec![
            step(StepType::Compound, SourceKind::ChemicalDatabase, 0.9),
            step(StepType::Physiology, SourceKind::PeerReviewedLiterature, 0.8),
            step(StepType::Physiology, SourceKind::SystematicReview, 0.7),
        ]);
        assert!(chain.valid);
        assert_eq!(chain.weakest_link_confidence, 0.7);
    }

    #[test]
    fn test_chain_ending_at_interaction_is_invalid() {
        let chain = validate_chain(vec![
            step(StepType::Compound, SourceKind::ChemicalDatabase, 0.9),
            step(StepType::Interaction, SourceKind::PeerReviewedLiterature, 0.8),
        ]);
        assert_eq!(
            chain.break_reason,
            Some(BreakReason::NonTerminalEnd { last: StepType::Interaction })
        );
    }

    #[test]
    fn test_lone_compound_is_invalid() {
        let chain = validate_chain(vec![step(StepType::Compound, SourceKind::ChemicalDatabase, 0.9)]);
        assert_eq!(chain.break_reason, Some(BreakReason::NonTerminalEnd { last: StepType::Compound }));
    }

    #[test]
    fn test_out_of_range_confidence_is_invalid() {
        let chain = validate_chain(full_chain([0.9, 1.2, 0.8, 0.8]));
        assert!(matches!(chain.break_reason, Some(BreakReason::ConfidenceOutOfRange { index: 1, .. })));
    }
}
