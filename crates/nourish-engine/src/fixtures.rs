//! Shared test fixtures

use nourish_domain::{
    ClaimInput, EffectDirection, EvidenceRecord, MechanismStep, SourceKind, StepType, StudyType,
};
use nourish_policy::{
    EvidencePolicy, GovernanceMetadata, PolicyDraft, PolicyRule, RuleCategory, TieBreak,
    TierThreshold,
};
use std::sync::Arc;

pub fn policy() -> Arc<EvidencePolicy> {
    let draft = PolicyDraft {
        policy_id: "nutrition-evidence".to_string(),
        version: "1.0.0".to_string(),
        published_at: 1_772_323_200,
        baseline_score: 0.3,
        tie_break: TieBreak::Inclusive,
        governance: Some(GovernanceMetadata {
            author: "nutrition-science".to_string(),
            review_board: "clinical-review".to_string(),
            approval_date: "2026-03-01".to_string(),
        }),
        tier_thresholds: vec![
            TierThreshold::new(0.9, "consensus"),
            TierThreshold::new(0.7, "strong"),
            TierThreshold::new(0.5, "moderate"),
            TierThreshold::new(0.3, "emerging"),
            TierThreshold::new(0.0, "speculative"),
        ],
        rules: vec![
            PolicyRule::new("study-design", RuleCategory::StudyTypeWeight)
                .with_param("meta-analysis", 0.3)
                .with_param("rct", 0.2)
                .with_param("observational", 0.1),
            PolicyRule::new("sample-size", RuleCategory::SampleSizeBonus)
                .with_param("high_threshold", 1000.0)
                .with_param("high_bonus", 0.15)
                .with_param("mid_threshold", 300.0)
                .with_param("mid_bonus", 0.1)
                .with_param("low_threshold", 50.0)
                .with_param("low_bonus", 0.05),
            PolicyRule::new("retraction", RuleCategory::RetractionPenalty)
                .with_param("penalty_score", 0.05),
        ],
    };
    Arc::new(draft.seal().unwrap())
}

pub fn omega3_claim() -> ClaimInput {
    let mut claim = ClaimInput::new("omega3-tg", "Fish oil lowers triglycerides");
    claim.compounds = vec!["fish oil".to_string()];
    claim.evidence = vec![EvidenceRecord::new(
        "ev-1",
        claim.claim_id.clone(),
        "pmid:0001",
        StudyType::MetaAnalysis,
        EffectDirection::Positive,
    )
    .with_sample_size(1200)];
    claim.mechanism = vec![
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
            0.85,
        ),
        MechanismStep::new(
            StepType::Outcome,
            "Lower serum triglycerides",
            SourceKind::SystematicReview,
            0.8,
        ),
    ];
    claim
}
