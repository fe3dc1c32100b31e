//! Evidence policy artifact
//!
//! A policy is pure data: scoring rules, tier thresholds and a baseline score,
//! bundled with governance metadata and sealed by a content hash. A published
//! policy is never edited; a change produces a new version and a new hash.

use crate::hashing::{attestation_for, content_hash};
use crate::PolicyError;
use nourish_domain::StudyType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Who authored and approved a policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceMetadata {
    /// Policy author
    pub author: String,
    /// Board that reviewed the policy
    pub review_board: String,
    /// Approval date (ISO 8601)
    pub approval_date: String,
}

/// How a score exactly on a tier boundary is treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// A score equal to a threshold reaches that tier
    #[default]
    Inclusive,
    /// A score must strictly exceed a threshold to reach that tier
    Exclusive,
}

/// Minimum score for a named confidence band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierThreshold {
    /// Lowest score that maps to this tier
    pub min_score: f64,
    /// Tier name (e.g. "strong")
    pub tier: String,
}

impl TierThreshold {
    /// Create a threshold
    pub fn new(min_score: f64, tier: impl Into<String>) -> Self {
        Self {
            min_score,
            tier: tier.into(),
        }
    }
}

/// The closed set of rule interpretations the engine knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Weight of the best matching study design
    StudyTypeWeight,
    /// Bonus from the total sample size
    SampleSizeBonus,
    /// Bonus from the most recent publication year
    RecencyBonus,
    /// Absorbing override when any record is retracted
    RetractionPenalty,
    /// Capped penalty per contradictory record
    ContradictionPenalty,
}

impl RuleCategory {
    /// Get the category name as written in policy artifacts
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::StudyTypeWeight => "study_type_weight",
            RuleCategory::SampleSizeBonus => "sample_size_bonus",
            RuleCategory::RecencyBonus => "recency_bonus",
            RuleCategory::RetractionPenalty => "retraction_penalty",
            RuleCategory::ContradictionPenalty => "contradiction_penalty",
        }
    }

    /// Parse a category name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "study_type_weight" => Some(RuleCategory::StudyTypeWeight),
            "sample_size_bonus" => Some(RuleCategory::SampleSizeBonus),
            "recency_bonus" => Some(RuleCategory::RecencyBonus),
            "retraction_penalty" => Some(RuleCategory::RetractionPenalty),
            "contradiction_penalty" => Some(RuleCategory::ContradictionPenalty),
            _ => None,
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scoring rule as stored in the artifact
///
/// The category is kept as written so that an unrecognized category is
/// reported as a governance failure instead of a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Rule identifier, unique within the policy
    pub id: String,
    /// Category name
    pub category: String,
    /// Fixed key/value parameters
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
}

impl PolicyRule {
    /// Create a rule
    pub fn new(id: impl Into<String>, category: RuleCategory) -> Self {
        Self {
            id: id.into(),
            category: category.as_str().to_string(),
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter
    pub fn with_param(mut self, key: impl Into<String>, value: f64) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    /// Resolve the category, failing on anything unrecognized
    pub fn category(&self) -> Result<RuleCategory, PolicyError> {
        RuleCategory::parse(&self.category).ok_or_else(|| PolicyError::UnknownRuleCategory {
            rule_id: self.id.clone(),
            category: self.category.clone(),
        })
    }

    /// Compile the rule into its typed form, checking every parameter
    pub fn compile(&self) -> Result<RuleSpec, PolicyError> {
        match self.category()? {
            RuleCategory::StudyTypeWeight => {
                let mut weights = Vec::with_capacity(self.params.len());
                for (key, weight) in &self.params {
                    let study_type =
                        StudyType::parse(key).ok_or_else(|| PolicyError::InvalidParameter {
                            rule_id: self.id.clone(),
                            parameter: key.clone(),
                            reason: "not a recognized study type".to_string(),
                        })?;
                    self.check_finite(key, *weight)?;
                    weights.push((study_type, *weight));
                }
                if weights.is_empty() {
                    return Err(PolicyError::MissingRuleParameter {
                        rule_id: self.id.clone(),
                        parameter: "<study type>".to_string(),
                    });
                }
                Ok(RuleSpec::StudyTypeWeight { weights })
            }
            RuleCategory::SampleSizeBonus => Ok(RuleSpec::SampleSizeBonus(self.ladder()?)),
            RuleCategory::RecencyBonus => Ok(RuleSpec::RecencyBonus(self.ladder()?)),
            RuleCategory::RetractionPenalty => {
                let penalty_score = self.param("penalty_score")?;
                if !(0.0..=1.0).contains(&penalty_score) {
                    return Err(PolicyError::InvalidParameter {
                        rule_id: self.id.clone(),
                        parameter: "penalty_score".to_string(),
                        reason: "must be within [0, 1]".to_string(),
                    });
                }
                Ok(RuleSpec::RetractionPenalty { penalty_score })
            }
            RuleCategory::ContradictionPenalty => {
                let per_contradiction = self.non_negative("per_contradiction")?;
                let max_penalty = self.non_negative("max_penalty")?;
                Ok(RuleSpec::ContradictionPenalty {
                    per_contradiction,
                    max_penalty,
                })
            }
        }
    }

    fn param(&self, key: &str) -> Result<f64, PolicyError> {
        let value = self
            .params
            .get(key)
            .copied()
            .ok_or_else(|| PolicyError::MissingRuleParameter {
                rule_id: self.id.clone(),
                parameter: key.to_string(),
            })?;
        self.check_finite(key, value)?;
        Ok(value)
    }

    fn non_negative(&self, key: &str) -> Result<f64, PolicyError> {
        let value = self.param(key)?;
        if value < 0.0 {
            return Err(PolicyError::InvalidParameter {
                rule_id: self.id.clone(),
                parameter: key.to_string(),
                reason: "must not be negative".to_string(),
            });
        }
        Ok(value)
    }

    fn check_finite(&self, key: &str, value: f64) -> Result<(), PolicyError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(PolicyError::InvalidParameter {
                rule_id: self.id.clone(),
                parameter: key.to_string(),
                reason: "must be a finite number".to_string(),
            })
        }
    }

    fn ladder(&self) -> Result<TierLadder, PolicyError> {
        let ladder = TierLadder {
            high: (self.param("high_threshold")?, self.param("high_bonus")?),
            mid: (self.param("mid_threshold")?, self.param("mid_bonus")?),
            low: (self.param("low_threshold")?, self.param("low_bonus")?),
        };
        if ladder.high.0 < ladder.mid.0 || ladder.mid.0 < ladder.low.0 {
            return Err(PolicyError::InvalidParameter {
                rule_id: self.id.clone(),
                parameter: "high_threshold/mid_threshold/low_threshold".to_string(),
                reason: "thresholds must satisfy high >= mid >= low".to_string(),
            });
        }
        Ok(ladder)
    }
}

/// High/mid/low thresholds, each with its own bonus
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierLadder {
    /// (threshold, bonus) of the high tier
    pub high: (f64, f64),
    /// (threshold, bonus) of the mid tier
    pub mid: (f64, f64),
    /// (threshold, bonus) of the low tier
    pub low: (f64, f64),
}

impl TierLadder {
    /// Bonus of the highest tier reached by `value`, if any
    ///
    /// No interpolation: a value between two thresholds gets the lower tier's bonus.
    pub fn bonus_for(&self, value: f64) -> Option<f64> {
        [self.high, self.mid, self.low]
            .into_iter()
            .find(|(threshold, _)| value >= *threshold)
            .map(|(_, bonus)| bonus)
    }
}

/// A rule with its parameters checked and typed
#[derive(Debug, Clone, PartialEq)]
pub enum RuleSpec {
    /// Weight per study type
    StudyTypeWeight {
        /// Declared weights
        weights: Vec<(StudyType, f64)>,
    },
    /// Ladder over the summed sample size
    SampleSizeBonus(TierLadder),
    /// Ladder over the latest publication year
    RecencyBonus(TierLadder),
    /// Absorbing override
    RetractionPenalty {
        /// Score the running score is set to
        penalty_score: f64,
    },
    /// Capped per-record penalty
    ContradictionPenalty {
        /// Penalty per contradictory record
        per_contradiction: f64,
        /// Cap on the total penalty
        max_penalty: f64,
    },
}

/// Unsealed policy content, as written by policy authors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDraft {
    /// Policy identifier
    pub policy_id: String,
    /// Semantic version
    pub version: String,
    /// Publication timestamp (seconds since Unix epoch)
    pub published_at: u64,
    /// Score every claim starts from
    pub baseline_score: f64,
    /// Boundary handling
    #[serde(default)]
    pub tie_break: TieBreak,
    /// Governance metadata
    pub governance: Option<GovernanceMetadata>,
    /// Tier thresholds
    pub tier_thresholds: Vec<TierThreshold>,
    /// Ordered rule set
    pub rules: Vec<PolicyRule>,
}

impl PolicyDraft {
    /// Load a draft from TOML
    pub fn from_toml(toml_str: &str) -> Result<Self, PolicyError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Compute the content hash and attestation and validate the result
    pub fn seal(self) -> Result<EvidencePolicy, PolicyError> {
        let hash = content_hash(
            self.baseline_score,
            self.tie_break,
            &self.tier_thresholds,
            &self.rules,
        )?;
        let policy = EvidencePolicy {
            policy_id: self.policy_id,
            version: self.version,
            published_at: self.published_at,
            attestation: attestation_for(&hash),
            content_hash: hash,
            baseline_score: self.baseline_score,
            tie_break: self.tie_break,
            governance: self.governance,
            tier_thresholds: self.tier_thresholds,
            rules: self.rules,
        };
        policy.validate()?;
        Ok(policy)
    }
}

/// A sealed, versioned evidence policy
///
/// Fields are read-only; the only way to obtain one is to seal a draft or
/// to load a published artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidencePolicy {
    policy_id: String,
    version: String,
    published_at: u64,
    content_hash: String,
    attestation: String,
    baseline_score: f64,
    #[serde(default)]
    tie_break: TieBreak,
    governance: Option<GovernanceMetadata>,
    tier_thresholds: Vec<TierThreshold>,
    rules: Vec<PolicyRule>,
}

impl EvidencePolicy {
    /// Policy identifier
    pub fn policy_id(&self) -> &str {
        &self.policy_id
    }

    /// Semantic version string
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Publication timestamp
    pub fn published_at(&self) -> u64 {
        self.published_at
    }

    /// Declared content hash
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// Declared attestation
    pub fn attestation(&self) -> &str {
        &self.attestation
    }

    /// Baseline score
    pub fn baseline_score(&self) -> f64 {
        self.baseline_score
    }

    /// Boundary handling
    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Governance metadata, if present
    pub fn governance(&self) -> Option<&GovernanceMetadata> {
        self.governance.as_ref()
    }

    /// Tier thresholds as declared
    pub fn tier_thresholds(&self) -> &[TierThreshold] {
        &self.tier_thresholds
    }

    /// Rules in execution order
    pub fn rules(&self) -> &[PolicyRule] {
        &self.rules
    }

    /// Parsed semantic version
    pub fn semver(&self) -> Result<(u64, u64, u64), PolicyError> {
        parse_semver(&self.version)
    }

    /// Recompute the content hash from the logic fields
    pub fn compute_hash(&self) -> Result<String, PolicyError> {
        content_hash(
            self.baseline_score,
            self.tie_break,
            &self.tier_thresholds,
            &self.rules,
        )
    }

    /// Back to an editable draft (for authoring a successor version)
    pub fn to_draft(&self) -> PolicyDraft {
        PolicyDraft {
            policy_id: self.policy_id.clone(),
            version: self.version.clone(),
            published_at: self.published_at,
            baseline_score: self.baseline_score,
            tie_break: self.tie_break,
            governance: self.governance.clone(),
            tier_thresholds: self.tier_thresholds.clone(),
            rules: self.rules.clone(),
        }
    }

    /// Full integrity and governance validation
    ///
    /// Any failure here is a hard failure: the policy must not be used.
    pub fn validate(&self) -> Result<(), PolicyError> {
        self.validate_governance()?;
        parse_semver(&self.version)?;

        let computed = self.compute_hash()?;
        if computed != self.content_hash {
            return Err(PolicyError::HashMismatch {
                policy_id: self.policy_id.clone(),
                declared: self.content_hash.clone(),
                computed,
            });
        }
        if self.attestation != attestation_for(&computed) {
            return Err(PolicyError::AttestationMismatch {
                policy_id: self.policy_id.clone(),
                attestation: self.attestation.clone(),
            });
        }

        if !(0.0..=1.0).contains(&self.baseline_score) {
            return Err(PolicyError::InvalidPolicy(format!(
                "baseline score {} is outside [0, 1]",
                self.baseline_score
            )));
        }

        self.validate_thresholds()?;

        let mut rule_ids = HashSet::new();
        for rule in &self.rules {
            if !rule_ids.insert(rule.id.as_str()) {
                return Err(PolicyError::InvalidPolicy(format!("duplicate rule id '{}'", rule.id)));
            }
            rule.compile()?;
        }

        Ok(())
    }

    fn validate_governance(&self) -> Result<(), PolicyError> {
        let missing = |field| PolicyError::MissingGovernance {
            policy_id: self.policy_id.clone(),
            field,
        };
        let governance = self.governance.as_ref().ok_or_else(|| missing("governance"))?;

        if governance.author.trim().is_empty() {
            return Err(missing("author"));
        }
        if governance.review_board.trim().is_empty() {
            return Err(missing("review_board"));
        }
        if governance.approval_date.trim().is_empty() {
            return Err(missing("approval_date"));
        }
        Ok(())
    }

    fn validate_thresholds(&self) -> Result<(), PolicyError> {
        if self.tier_thresholds.is_empty() {
            return Err(PolicyError::InvalidThresholds("no tier thresholds declared".to_string()));
        }

        let mut names = HashSet::new();
        for threshold in &self.tier_thresholds {
            if !(0.0..=1.0).contains(&threshold.min_score) {
                return Err(PolicyError::InvalidThresholds(format!(
                    "threshold {} for '{}' is outside [0, 1]",
                    threshold.min_score, threshold.tier
                )));
            }
            if threshold.tier.trim().is_empty() {
                return Err(PolicyError::InvalidThresholds("empty tier name".to_string()));
            }
            if !names.insert(threshold.tier.as_str()) {
                return Err(PolicyError::InvalidThresholds(format!(
                    "duplicate tier '{}'",
                    threshold.tier
                )));
            }
        }

        let floor = self
            .tier_thresholds
            .iter()
            .map(|t| t.min_score)
            .fold(f64::INFINITY, f64::min);
        if floor != 0.0 {
            return Err(PolicyError::InvalidThresholds(
                "lowest threshold must be 0.0 so every score maps to a tier".to_string(),
            ));
        }
        Ok(())
    }

    /// Map a clamped score to its tier name
    ///
    /// Thresholds are scanned from highest to lowest; the first one not
    /// exceeding the score wins. The 0.0 floor always matches.
    pub fn tier_for(&self, score: f64) -> &str {
        let mut ordered: Vec<&TierThreshold> = self.tier_thresholds.iter().collect();
        ordered.sort_by(|a, b| b.min_score.total_cmp(&a.min_score));

        let floor = ordered.last().copied();
        let reached = ordered.into_iter().find(|t| match self.tie_break {
            TieBreak::Inclusive => score >= t.min_score,
            TieBreak::Exclusive => score > t.min_score,
        });

        reached.or(floor).map(|t| t.tier.as_str()).unwrap_or("")
    }

    /// Load a published policy from TOML
    pub fn from_toml(toml_str: &str) -> Result<Self, PolicyError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load a published policy from JSON
    pub fn from_json(json_str: &str) -> Result<Self, PolicyError> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String, PolicyError> {
        toml::to_string_pretty(self).map_err(|e| PolicyError::Serialization(e.to_string()))
    }
}

fn parse_semver(version: &str) -> Result<(u64, u64, u64), PolicyError> {
    let invalid = || PolicyError::InvalidVersion(version.to_string());
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() != 3 {
        return Err(invalid());
    }

    let mut numbers = [0u64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        *slot = part.parse().map_err(|_| invalid())?;
    }
    Ok((numbers[0], numbers[1], numbers[2]))
}
