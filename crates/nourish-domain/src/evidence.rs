//! Evidence records and the frozen evidence set

use crate::ClaimId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Design of the study behind an evidence record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StudyType {
    /// Pooled analysis of several trials
    MetaAnalysis,
    /// Structured review of the literature
    SystematicReview,
    /// Randomized controlled trial
    Rct,
    /// Cohort, case-control or cross-sectional study
    Observational,
    /// Animal model
    Animal,
    /// Cell or tissue culture
    InVitro,
    /// Reasoning from known mechanisms, no direct study
    MechanisticInference,
}

impl StudyType {
    /// All study types, strongest design first
    pub const ALL: [StudyType; 7] = [
        StudyType::MetaAnalysis,
        StudyType::SystematicReview,
        StudyType::Rct,
        StudyType::Observational,
        StudyType::Animal,
        StudyType::InVitro,
        StudyType::MechanisticInference,
    ];

    /// Get the study type name as used in policy parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            StudyType::MetaAnalysis => "meta-analysis",
            StudyType::SystematicReview => "systematic-review",
            StudyType::Rct => "rct",
            StudyType::Observational => "observational",
            StudyType::Animal => "animal",
            StudyType::InVitro => "in-vitro",
            StudyType::MechanisticInference => "mechanistic-inference",
        }
    }

    /// Parse a study type from its name (underscores accepted)
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|t| t.as_str() == normalized)
    }
}

impl fmt::Display for StudyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of the effect reported by a study
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectDirection {
    /// Supports the claim
    Positive,
    /// Reports the opposite effect
    Negative,
    /// No measurable effect
    Neutral,
    /// Mixed or internally contradictory results
    Contradictory,
}

/// One structured citation supporting or contradicting a claim
///
/// Records are produced by the evidence-resolution collaborator and are
/// never altered afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    /// Record identifier
    pub id: String,

    /// Claim this record was resolved for
    pub claim_id: ClaimId,

    /// Source identifier (DOI, PMID, database key)
    pub source_id: String,

    /// Study design
    pub study_type: StudyType,

    /// Experimental model (e.g. "human", "mouse", "hepatocyte culture")
    pub experimental_model: String,

    /// Studied population, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<String>,

    /// Number of participants or samples, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_size: Option<u64>,

    /// Publication year, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,

    /// Reported effect direction
    pub effect_direction: EffectDirection,

    /// Whether the publication has been retracted
    #[serde(default, rename = "retraction_status")]
    pub retracted: bool,

    /// Ids of other records this one contradicts
    #[serde(default)]
    pub contradicts: Vec<String>,

    /// Evidence grade assigned by the resolver (e.g. "A", "B", "low")
    #[serde(default)]
    pub grade: String,
}

impl EvidenceRecord {
    /// Create a record with the mandatory fields; optional fields start empty
    pub fn new(
        id: impl Into<String>,
        claim_id: ClaimId,
        source_id: impl Into<String>,
        study_type: StudyType,
        effect_direction: EffectDirection,
    ) -> Self {
        Self {
            id: id.into(),
            claim_id,
            source_id: source_id.into(),
            study_type,
            experimental_model: "human".to_string(),
            population: None,
            sample_size: None,
            year: None,
            effect_direction,
            retracted: false,
            contradicts: Vec::new(),
            grade: String::new(),
        }
    }

    /// Set the sample size
    pub fn with_sample_size(mut self, sample_size: u64) -> Self {
        self.sample_size = Some(sample_size);
        self
    }

    /// Set the publication year
    pub fn with_year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    /// Mark the record as retracted
    pub fn retracted(mut self) -> Self {
        self.retracted = true;
        self
    }
}

/// A record handed to [`EvidenceSet::freeze`] for a different claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignEvidence {
    /// Claim being frozen
    pub expected: ClaimId,
    /// Offending record
    pub record_id: String,
    /// Claim the record actually belongs to
    pub found: ClaimId,
}

impl fmt::Display for ForeignEvidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "evidence record '{}' belongs to claim '{}', not '{}'",
            self.record_id, self.found, self.expected
        )
    }
}

impl std::error::Error for ForeignEvidence {}

/// The frozen evidence judged for a single claim
///
/// Built once at the evidence-resolution boundary and only ever read
/// afterwards: there is no way to add, remove or edit a record once frozen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidenceSet {
    claim_id: ClaimId,
    records: Box<[EvidenceRecord]>,
}

impl EvidenceSet {
    /// Freeze the records resolved for `claim_id`
    ///
    /// # Errors
    /// Returns [`ForeignEvidence`] if any record is owned by another claim.
    pub fn freeze(claim_id: ClaimId, records: Vec<EvidenceRecord>) -> Result<Self, ForeignEvidence> {
        if let Some(foreign) = records.iter().find(|r| r.claim_id != claim_id) {
            return Err(ForeignEvidence {
                expected: claim_id,
                record_id: foreign.id.clone(),
                found: foreign.claim_id.clone(),
            });
        }

        Ok(Self {
            claim_id,
            records: records.into_boxed_slice(),
        })
    }

    /// Claim the set was frozen for
    pub fn claim_id(&self) -> &ClaimId {
        &self.claim_id
    }

    /// The frozen records, in resolution order
    pub fn records(&self) -> &[EvidenceRecord] {
        &self.records
    }

    /// Iterate over the records
    pub fn iter(&self) -> impl Iterator<Item = &EvidenceRecord> {
        self.records.iter()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set holds no evidence at all
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
