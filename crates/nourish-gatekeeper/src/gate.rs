//! Recommendation gate
//!
//! An ordered cascade; the first applicable rule decides:
//!
//! 1. explanatory claim → ALLOW / `safe_to_discuss_only`
//! 2. invalid mechanism → WITHHOLD / `insufficient_context`
//! 3. blocking risk → WITHHOLD / `identified_risk`
//! 4. unknown risk → REQUIRE_MORE_CONTEXT / `insufficient_context`
//! 5. missing population or dose → REQUIRE_MORE_CONTEXT / `insufficient_context`
//! 6. partial (or no) applicability match → REQUIRE_MORE_CONTEXT / `population_mismatch`
//! 7. otherwise → ALLOW / `mechanism_strong`
//!
//! Explanations are filled from fixed templates.

use crate::applicability::{compute_match, ApplicabilityMatch, Dimension};
use crate::mechanism::validate_chain;
use crate::risk::{RiskAssessment, RiskEngine};
use crate::{GatekeeperConfig, GatekeeperError};
use nourish_domain::{
    ApplicabilityProfile, ClaimKind, Decision, MechanismChain, MechanismStep, ReasonCode,
    RecommendationResult, UserContext,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Decide on a claim from its mechanism, risk and applicability
pub fn decide(
    kind: ClaimKind,
    chain: &MechanismChain,
    risk: &RiskAssessment,
    applicability: &ApplicabilityMatch,
) -> RecommendationResult {
    if kind == ClaimKind::Explanatory {
        return RecommendationResult::new(
            Decision::Allow,
            ReasonCode::SafeToDiscussOnly,
            "This explains how something works and is not a recommendation.",
        );
    }

    if !chain.valid {
        let detail = chain
            .break_reason
            .as_ref()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "mechanism chain is invalid".to_string());
        return RecommendationResult::new(
            Decision::Withhold,
            ReasonCode::InsufficientContext,
            format!("The proposed mechanism does not hold up: {}.", detail),
        );
    }

    if let Some(flag) = risk
        .flags
        .iter()
        .filter(|f| f.severity.is_blocking())
        .max_by_key(|f| f.severity)
    {
        return RecommendationResult::new(
            Decision::Withhold,
            ReasonCode::IdentifiedRisk,
            format!(
                "Known {} risk for {}: {}.",
                flag.severity, flag.compound, flag.description
            ),
        );
    }

    if risk.unknown_risk {
        return RecommendationResult::new(
            Decision::RequireMoreContext,
            ReasonCode::InsufficientContext,
            format!(
                "Safety for the {} population at evidence coverage {:.2} cannot be established.",
                risk.population, risk.coverage_score
            ),
        );
    }

    if applicability.has_missing_critical_field() {
        return RecommendationResult::new(
            Decision::RequireMoreContext,
            ReasonCode::InsufficientContext,
            format!(
                "More information is needed before this applies to you: {}.",
                join(&applicability.missing_fields)
            ),
        );
    }

    if !applicability.exact_match {
        let differing = if applicability.mismatched.is_empty() {
            &applicability.missing_fields
        } else {
            &applicability.mismatched
        };
        return RecommendationResult::new(
            Decision::RequireMoreContext,
            ReasonCode::PopulationMismatch,
            format!(
                "The supporting evidence was gathered under different conditions ({}).",
                join(differing)
            ),
        );
    }

    RecommendationResult::new(
        Decision::Allow,
        ReasonCode::MechanismStrong,
        "The mechanism is well supported and applies to your situation.",
    )
}

fn join(dimensions: &[Dimension]) -> String {
    dimensions
        .iter()
        .map(|d| d.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Everything the gatekeeper worked out for one claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateReport {
    /// Validated mechanism chain
    pub chain: MechanismChain,
    /// Risk assessment
    pub risk: RiskAssessment,
    /// Applicability match
    pub applicability: ApplicabilityMatch,
    /// Gate decision
    pub recommendation: RecommendationResult,
}

/// What the gatekeeper needs to know about a claim
#[derive(Debug, Clone, Copy)]
pub struct GateInput<'a> {
    /// Speech act
    pub kind: ClaimKind,
    /// Proposed causal chain
    pub mechanism: &'a [MechanismStep],
    /// Compound hints
    pub compounds: &'a [String],
    /// Conditions the claim was established under
    pub profile: &'a ApplicabilityProfile,
    /// Evidence coverage [0.0, 1.0]
    pub coverage_score: f64,
}

/// Mechanism engine, risk engine, applicability matcher and gate behind one handle
///
/// Holds no per-session state and can be shared freely.
#[derive(Debug, Clone)]
pub struct Gatekeeper {
    config: GatekeeperConfig,
    risk: RiskEngine,
}

impl Gatekeeper {
    /// Create a gatekeeper with the given configuration
    pub fn new(config: GatekeeperConfig) -> Result<Self, GatekeeperError> {
        config.validate().map_err(GatekeeperError::Config)?;
        let risk = RiskEngine::new(&config);
        Ok(Self { config, risk })
    }

    /// Create a gatekeeper with default configuration
    pub fn default_config() -> Self {
        let config = GatekeeperConfig::default();
        let risk = RiskEngine::new(&config);
        Self { config, risk }
    }

    /// The active configuration
    pub fn config(&self) -> &GatekeeperConfig {
        &self.config
    }

    /// Population used when the user has not stated one
    pub fn default_population(&self) -> &str {
        &self.config.default_population
    }

    /// Run the full mechanism → risk → applicability → gate cascade
    pub fn review(&self, input: GateInput<'_>, context: &UserContext) -> GateReport {
        let chain = validate_chain(input.mechanism.to_vec());
        let population = context
            .population
            .as_deref()
            .unwrap_or(&self.config.default_population);
        let risk = self.risk.assess(input.compounds, population, input.coverage_score);
        let applicability = compute_match(input.profile, context);
        let recommendation = decide(input.kind, &chain, &risk, &applicability);

        debug!(
            valid_chain = chain.valid,
            weakest_link = chain.weakest_link_confidence,
            blocking_risk = risk.has_blocking_risk(),
            unknown_risk = risk.unknown_risk,
            applicability = applicability.confidence,
            decision = %recommendation.decision,
            reason = %recommendation.reason,
            "Gate evaluated"
        );

        GateReport {
            chain,
            risk,
            applicability,
            recommendation,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::risk::{RiskFlag, Severity};
    use nourish_domain::{BreakReason, SourceKind, StepType};
    use proptest::prelude::*;

    fn arb_severity() -> impl Strategy<Value = Severity> {
        prop_oneof![Just(Severity::Low), Just(Severity::Moderate), Just(Severity::High)]
    }

    fn arb_dimensions() -> impl Strategy<Value = Vec<Dimension>> {
        proptest::sample::subsequence(
            vec![Dimension::Population, Dimension::DietaryContext, Dimension::Dose],
            0..=3,
        )
    }

    proptest! {
        /// Property: a broken mechanism always withholds with insufficient_context
        #[test]
        fn test_broken_mechanism_always_withholds(
            severities in proptest::collection::vec(arb_severity(), 0..4),
            unknown_risk in any::<bool>(),
            missing in arb_dimensions(),
            coverage in 0.0f64..=1.0,
        ) {
            let chain = MechanismChain {
                steps: vec![MechanismStep::new(StepType::Compound, "x", SourceKind::ChemicalDatabase, 0.9)],
                valid: false,
                weakest_link_confidence: 0.9,
                break_reason: Some(BreakReason::NonTerminalEnd { last: StepType::Compound }),
            };
            let risk = RiskAssessment {
                flags: severities
                    .into_iter()
                    .map(|severity| RiskFlag {
                        compound: "c".to_string(),
                        category: "k".to_string(),
                        description: "d".to_string(),
                        severity,
                    })
                    .collect(),
                unknown_risk,
                coverage_score: coverage,
                population: "general".to_string(),
            };
            let applicability = ApplicabilityMatch {
                exact_match: missing.is_empty(),
                partial_match: false,
                confidence: if missing.is_empty() { 1.0 } else { 0.0 },
                matched: Vec::new(),
                mismatched: Vec::new(),
                missing_fields: missing,
            };

            let result = decide(ClaimKind::Recommendation, &chain, &risk, &applicability);
            prop_assert_eq!(result.decision, Decision::Withhold);
            prop_assert_eq!(result.reason, ReasonCode::InsufficientContext);
        }
    }
}
