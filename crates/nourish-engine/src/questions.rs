//! Clarifying question templates
//!
//! Questions are slot-filled from fixed templates; the engine never
//! composes free text.

use nourish_domain::{ClaimId, ClaimInput, Decision, ReasonCode};
use nourish_gatekeeper::{Dimension, GateReport};
use serde::{Deserialize, Serialize};

/// What a clarifying question is trying to learn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// The user's population is unknown
    MissingPopulation,
    /// The dose is unknown
    MissingDose,
    /// The dietary pattern is unknown
    MissingDiet,
    /// Safety cannot be judged without more about the user
    UnknownRisk,
    /// The evidence was gathered in a different population or setting
    PopulationMismatch,
}

/// A question proposed to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarifyingQuestion {
    /// Claim whose decision the answer would unblock
    pub claim_id: ClaimId,
    /// What the question asks about
    pub kind: QuestionKind,
    /// Rendered question
    pub text: String,
}

const MISSING_POPULATION: &str =
    "Which group best describes you, for example pregnant, older adult, child or athlete?";
const MISSING_DIET: &str = "Do you follow a particular diet, such as vegan, vegetarian or low-carb?";

fn subject(claim: &ClaimInput) -> &str {
    claim
        .compounds
        .first()
        .map(String::as_str)
        .unwrap_or("this")
}

/// Pick the question that would unblock a REQUIRE_MORE_CONTEXT decision
///
/// Follows the gate's own reason: unknown risk first, then missing critical
/// fields in population/dose order, then a population mismatch. Returns
/// `None` for any other decision.
pub fn question_for(claim: &ClaimInput, report: &GateReport) -> Option<ClarifyingQuestion> {
    let recommendation = &report.recommendation;
    if recommendation.decision != Decision::RequireMoreContext {
        return None;
    }

    let subject = subject(claim);
    let applicability = &report.applicability;
    let missing = |d: Dimension| applicability.missing_fields.contains(&d);

    let (kind, text) = if report.risk.unknown_risk {
        (
            QuestionKind::UnknownRisk,
            format!(
                "Do you have any health conditions or take any medications that {} might affect?",
                subject
            ),
        )
    } else if missing(Dimension::Population) {
        (QuestionKind::MissingPopulation, MISSING_POPULATION.to_string())
    } else if missing(Dimension::Dose) {
        (
            QuestionKind::MissingDose,
            format!("How much {} do you take, and how often?", subject),
        )
    } else if recommendation.reason == ReasonCode::PopulationMismatch {
        let studied = claim
            .applicability
            .population
            .as_deref()
            .filter(|_| applicability.mismatched.contains(&Dimension::Population));
        match studied {
            Some(population) => (
                QuestionKind::PopulationMismatch,
                format!(
                    "The evidence for {} comes from {} participants. Does that describe you?",
                    subject, population
                ),
            ),
            None if missing(Dimension::DietaryContext) => (QuestionKind::MissingDiet, MISSING_DIET.to_string()),
            None => (
                QuestionKind::PopulationMismatch,
                format!(
                    "The evidence for {} was gathered under different conditions than yours. Can you tell me more about your situation?",
                    subject
                ),
            ),
        }
    } else {
        return None;
    };

    Some(ClarifyingQuestion {
        claim_id: claim.claim_id.clone(),
        kind,
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nourish_domain::{ApplicabilityProfile, UserContext};
    use nourish_gatekeeper::{GateInput, Gatekeeper};

    fn claim(profile: ApplicabilityProfile) -> ClaimInput {
        let mut claim = ClaimInput::new("omega3-tg", "Fish oil lowers triglycerides");
        claim.compounds = vec!["fish oil".to_string()];
        claim.applicability = profile;
        claim.mechanism = omega3_chain();
        claim
    }

    fn omega3_chain() -> Vec<nourish_domain::MechanismStep> {
        use nourish_domain::{MechanismStep, SourceKind, StepType};
        vec![
            MechanismStep::new(StepType::Compound, "EPA/DHA", SourceKind::ChemicalDatabase, 0.9),
            MechanismStep::new(
                StepType::Interaction,
                "PPAR-alpha activation",
                SourceKind::PeerReviewedLiterature,
                0.8,
            ),
            MechanismStep::new(
                StepType::Physiology,
                "Reduced hepatic VLDL secretion",
                SourceKind::PeerReviewedLiterature,
                0.8,
            ),
            MechanismStep::new(
                StepType::Outcome,
                "Lower serum triglycerides",
                SourceKind::SystematicReview,
                0.8,
            ),
        ]
    }

    fn review(claim: &ClaimInput, context: &UserContext, coverage: f64) -> GateReport {
        Gatekeeper::default_config().review(
            GateInput {
                kind: claim.kind,
                mechanism: &claim.mechanism,
                compounds: &claim.compounds,
                profile: &claim.applicability,
                coverage_score: coverage,
            },
            context,
        )
    }

    fn profile(population: Option<&str>, dose: Option<&str>) -> ApplicabilityProfile {
        ApplicabilityProfile {
            population: population.map(String::from),
            dietary_context: None,
            dose: dose.map(String::from),
        }
    }

    #[test]
    fn test_unknown_risk_question() {
        let claim = claim(ApplicabilityProfile::default());
        let report = review(&claim, &UserContext::default(), 0.2);
        let question = question_for(&claim, &report).unwrap();
        assert_eq!(question.kind, QuestionKind::UnknownRisk);
        assert!(question.text.contains("fish oil"));
    }

    #[test]
    fn test_missing_dose_question() {
        let claim = claim(profile(None, Some("2g")));
        let report = review(&claim, &UserContext::default(), 0.8);
        let question = question_for(&claim, &report).unwrap();
        assert_eq!(question.kind, QuestionKind::MissingDose);
        assert_eq!(question.text, "How much fish oil do you take, and how often?");
        assert_eq!(question.claim_id, ClaimId::new("omega3-tg"));
    }

    #[test]
    fn test_population_mismatch_question() {
        let claim = claim(profile(Some("adult"), None));
        let context = UserContext {
            population: Some("general".to_string()),
            ..UserContext::default()
        };
        let report = review(&claim, &context, 0.8);
        let question = question_for(&claim, &report).unwrap();
        assert_eq!(question.kind, QuestionKind::PopulationMismatch);
        assert!(question.text.contains("adult participants"));
    }

    #[test]
    fn test_no_question_when_allowed() {
        let claim = claim(ApplicabilityProfile::default());
        let report = review(&claim, &UserContext::default(), 0.8);
        assert_eq!(report.recommendation.decision, Decision::Allow);
        assert!(question_for(&claim, &report).is_none());
    }
}
