//! Policy execution
//!
//! Runs a sealed policy against one claim's frozen evidence. Execution is a
//! pure function of (claim, evidence, policy): no clock, no randomness, and
//! rules always run in the policy's declared order, so identical inputs give
//! identical breakdowns.

use crate::{EvidencePolicy, PolicyError, RuleCategory, RuleSpec};
use nourish_domain::{ClaimId, EffectDirection, EvidenceSet, StudyType};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What a rule looked at when it ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObservedInput {
    /// Best-weighted matching study type, if any record matched
    StudyType {
        /// Matching study type
        matched: Option<StudyType>,
    },
    /// Sum of reported sample sizes
    TotalSampleSize {
        /// Total
        total: u64,
    },
    /// Most recent publication year
    LatestYear {
        /// Year, if any record reported one
        year: Option<u32>,
    },
    /// Number of retracted records
    Retractions {
        /// Count
        count: usize,
    },
    /// Number of records with a contradictory effect direction
    Contradictions {
        /// Count
        count: usize,
    },
}

/// Trace entry for one rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleFiring {
    /// Rule id
    pub rule_id: String,
    /// Rule category
    pub category: RuleCategory,
    /// Input the rule observed
    pub observed: ObservedInput,
    /// Change applied to the running score
    pub contribution: f64,
    /// Whether the rule changed the score
    pub fired: bool,
}

/// The sole explanation artifact of a confidence score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    /// Claim scored
    pub claim_id: ClaimId,
    /// Policy id
    pub policy_id: String,
    /// Policy version
    pub policy_version: String,
    /// Policy content hash
    pub policy_hash: String,
    /// Baseline the running score started from
    pub baseline: f64,
    /// Final score, clamped to [0, 1]
    pub final_score: f64,
    /// Tier the final score maps to
    pub tier: String,
    /// Rule firings in execution order
    pub firings: Vec<RuleFiring>,
    /// Rule that terminated execution early (retraction)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminated_by: Option<String>,
}

/// Execute `policy` against the frozen evidence of `claim_id`
///
/// # Errors
/// Fails hard if the policy does not pass its own integrity validation, if a
/// rule category is unrecognized, or if the evidence was frozen for another
/// claim. None of these are user-facing conditions.
pub fn execute(
    claim_id: &ClaimId,
    evidence: &EvidenceSet,
    policy: &EvidencePolicy,
) -> Result<ConfidenceBreakdown, PolicyError> {
    policy.validate()?;

    if evidence.claim_id() != claim_id {
        return Err(PolicyError::EvidenceMismatch {
            expected: claim_id.to_string(),
            found: evidence.claim_id().to_string(),
        });
    }

    let mut score = policy.baseline_score();
    let mut firings = Vec::with_capacity(policy.rules().len());
    let mut terminated_by = None;

    for rule in policy.rules() {
        let category = rule.category()?;
        let (observed, contribution) = match rule.compile()? {
            RuleSpec::StudyTypeWeight { weights } => study_type_weight(evidence, &weights),
            RuleSpec::SampleSizeBonus(ladder) => {
                let total = evidence
                    .iter()
                    .filter_map(|r| r.sample_size)
                    .fold(0u64, u64::saturating_add);
                let bonus = ladder.bonus_for(total as f64).unwrap_or(0.0);
                (ObservedInput::TotalSampleSize { total }, bonus)
            }
            RuleSpec::RecencyBonus(ladder) => {
                let year = evidence.iter().filter_map(|r| r.year).max();
                let bonus = year
                    .and_then(|y| ladder.bonus_for(f64::from(y)))
                    .unwrap_or(0.0);
                (ObservedInput::LatestYear { year }, bonus)
            }
            RuleSpec::RetractionPenalty { penalty_score } => {
                let count = evidence.iter().filter(|r| r.retracted).count();
                if count > 0 {
                    let contribution = penalty_score - score;
                    score = penalty_score;
                    firings.push(RuleFiring {
                        rule_id: rule.id.clone(),
                        category,
                        observed: ObservedInput::Retractions { count },
                        contribution,
                        fired: true,
                    });
                    debug!(
                        claim_id = %claim_id,
                        rule_id = %rule.id,
                        retracted = count,
                        "Retraction is absorbing, stopping rule execution"
                    );
                    terminated_by = Some(rule.id.clone());
                    break;
                }
                (ObservedInput::Retractions { count }, 0.0)
            }
            RuleSpec::ContradictionPenalty {
                per_contradiction,
                max_penalty,
            } => {
                let count = evidence
                    .iter()
                    .filter(|r| r.effect_direction == EffectDirection::Contradictory)
                    .count();
                let penalty = (count as f64 * per_contradiction).min(max_penalty);
                (ObservedInput::Contradictions { count }, -penalty)
            }
        };

        score += contribution;
        debug!(
            claim_id = %claim_id,
            rule_id = %rule.id,
            category = %category,
            contribution,
            running = score,
            "Rule evaluated"
        );
        firings.push(RuleFiring {
            rule_id: rule.id.clone(),
            category,
            observed,
            contribution,
            fired: contribution != 0.0,
        });
    }

    let final_score = score.clamp(0.0, 1.0);
    let tier = policy.tier_for(final_score).to_string();

    Ok(ConfidenceBreakdown {
        claim_id: claim_id.clone(),
        policy_id: policy.policy_id().to_string(),
        policy_version: policy.version().to_string(),
        policy_hash: policy.content_hash().to_string(),
        baseline: policy.baseline_score(),
        final_score,
        tier,
        firings,
        terminated_by,
    })
}

/// Maximum weight among records whose study type is declared; applied once
fn study_type_weight(evidence: &EvidenceSet, weights: &[(StudyType, f64)]) -> (ObservedInput, f64) {
    let best = evidence
        .iter()
        .filter_map(|record| {
            weights
                .iter()
                .find(|(study_type, _)| *study_type == record.study_type)
                .copied()
        })
        .fold(None, |best: Option<(StudyType, f64)>, candidate| match best {
            Some(current) if current.1 >= candidate.1 => Some(current),
            _ => Some(candidate),
        });

    match best {
        Some((study_type, weight)) => (ObservedInput::StudyType { matched: Some(study_type) }, weight),
        None => (ObservedInput::StudyType { matched: None }, 0.0),
    }
}
