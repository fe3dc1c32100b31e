//! Decision comparator

use crate::BeliefState;
use nourish_domain::{ChangeType, ClaimId, Decision, DecisionDelta};
use std::cmp::Ordering;

/// Classify a decision against the one recorded before it
pub fn classify_change(prior: Option<Decision>, current: Decision) -> ChangeType {
    match prior {
        None => ChangeType::NewDecision,
        Some(prior) => match current.rank().cmp(&prior.rank()) {
            Ordering::Greater => ChangeType::Upgrade,
            Ordering::Less => ChangeType::Downgrade,
            Ordering::Equal => ChangeType::Stable,
        },
    }
}

/// Compare this turn's decision for a claim with the session's prior decision
pub fn compare(state: &BeliefState, claim_id: &ClaimId, current: Decision) -> DecisionDelta {
    let prior = state.prior_decision(claim_id).map(|p| p.decision);
    DecisionDelta {
        claim_id: claim_id.clone(),
        prior,
        current,
        change: classify_change(prior, current),
    }
}
