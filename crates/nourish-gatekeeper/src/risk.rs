//! Risk assessment
//!
//! "No risk found" and "risk unknown" are different answers. Risk is unknown
//! whenever evidence coverage is thin or the user is outside the default
//! population, regardless of what the known-risk table says.

use crate::GatekeeperConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Severity of a known risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Worth mentioning, never blocking
    Low,
    /// Blocks a recommendation
    Moderate,
    /// Blocks a recommendation
    High,
}

impl Severity {
    /// Whether this severity blocks a recommendation
    pub fn is_blocking(&self) -> bool {
        *self >= Severity::Moderate
    }

    /// Get the severity name
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry of the known-risk table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownRisk {
    /// Compound name, matched case-insensitively
    pub compound: String,
    /// Risk category (e.g. "drug_interaction")
    pub category: String,
    /// What the risk is
    pub description: String,
    /// Severity
    pub severity: Severity,
}

impl KnownRisk {
    /// Create a table entry
    pub fn new(
        compound: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            compound: compound.into(),
            category: category.into(),
            description: description.into(),
            severity,
        }
    }
}

/// A known risk that applies to one of the claim's compounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFlag {
    /// Compound as named in the claim
    pub compound: String,
    /// Risk category
    pub category: String,
    /// Description from the table
    pub description: String,
    /// Severity
    pub severity: Severity,
}

/// Outcome of a risk assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Known risks found for the claim's compounds
    pub flags: Vec<RiskFlag>,
    /// Risk could not be judged; never equivalent to "safe"
    pub unknown_risk: bool,
    /// Coverage score the assessment was made with
    pub coverage_score: f64,
    /// Population the assessment was made for
    pub population: String,
}

impl RiskAssessment {
    /// Whether any flag is moderate or high severity
    pub fn has_blocking_risk(&self) -> bool {
        self.flags.iter().any(|f| f.severity.is_blocking())
    }
}

/// Looks compounds up in the known-risk table
#[derive(Debug, Clone)]
pub struct RiskEngine {
    table: HashMap<String, Vec<KnownRisk>>,
    coverage_threshold: f64,
    default_population: String,
}

impl RiskEngine {
    /// Build an engine from the gatekeeper configuration
    pub fn new(config: &GatekeeperConfig) -> Self {
        let mut table: HashMap<String, Vec<KnownRisk>> = HashMap::new();
        for risk in &config.known_risks {
            table
                .entry(normalize(&risk.compound))
                .or_default()
                .push(risk.clone());
        }

        Self {
            table,
            coverage_threshold: config.unknown_risk_coverage_threshold,
            default_population: normalize(&config.default_population),
        }
    }

    /// Assess the compounds of a claim for the given population
    pub fn assess(&self, compounds: &[String], population: &str, coverage_score: f64) -> RiskAssessment {
        let flags: Vec<RiskFlag> = compounds
            .iter()
            .flat_map(|compound| {
                self.table
                    .get(&normalize(compound))
                    .into_iter()
                    .flatten()
                    .map(move |risk| RiskFlag {
                        compound: compound.clone(),
                        category: risk.category.clone(),
                        description: risk.description.clone(),
                        severity: risk.severity,
                    })
            })
            .collect();

        let unknown_risk =
            coverage_score < self.coverage_threshold || normalize(population) != self.default_population;

        debug!(
            compounds = compounds.len(),
            flags = flags.len(),
            unknown_risk,
            coverage_score,
            population,
            "Risk assessed"
        );

        RiskAssessment {
            flags,
            unknown_risk,
            coverage_score,
            population: population.to_string(),
        }
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new(&GatekeeperConfig::default())
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
