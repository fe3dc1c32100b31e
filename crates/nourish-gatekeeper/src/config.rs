//! Gatekeeper configuration

use crate::risk::{KnownRisk, Severity};
use nourish_domain::DEFAULT_POPULATION;
use serde::{Deserialize, Serialize};

/// Configuration for the risk engine and recommendation gate
///
/// # Examples
///
/// ```
/// use nourish_gatekeeper::GatekeeperConfig;
///
/// let config = GatekeeperConfig::default();
/// assert_eq!(config.unknown_risk_coverage_threshold, 0.5);
/// assert_eq!(config.default_population, "general");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatekeeperConfig {
    /// Coverage below which risk is treated as unknown
    /// Default: 0.5
    pub unknown_risk_coverage_threshold: f64,

    /// Population name under which risk can be judged from the table alone
    /// Default: "general"
    pub default_population: String,

    /// Known compound risks
    #[serde(default = "default_known_risks")]
    pub known_risks: Vec<KnownRisk>,
}

impl Default for GatekeeperConfig {
    fn default() -> Self {
        Self {
            unknown_risk_coverage_threshold: 0.5,
            default_population: DEFAULT_POPULATION.to_string(),
            known_risks: default_known_risks(),
        }
    }
}

impl GatekeeperConfig {
    /// Strict preset: more evidence coverage required before risk is considered known
    pub fn strict() -> Self {
        Self {
            unknown_risk_coverage_threshold: 0.7,
            ..Self::default()
        }
    }

    /// Lenient preset: thinner coverage accepted
    pub fn lenient() -> Self {
        Self {
            unknown_risk_coverage_threshold: 0.3,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.unknown_risk_coverage_threshold) {
            return Err("unknown_risk_coverage_threshold must be within [0, 1]".to_string());
        }
        if self.default_population.trim().is_empty() {
            return Err("default_population must not be empty".to_string());
        }
        for risk in &self.known_risks {
            if risk.compound.trim().is_empty() {
                return Err("known risk entries need a compound name".to_string());
            }
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

fn default_known_risks() -> Vec<KnownRisk> {
    vec![
        KnownRisk::new(
            "vitamin k",
            "drug_interaction",
            "Antagonizes warfarin and other vitamin K antagonists",
            Severity::High,
        ),
        KnownRisk::new(
            "st. john's wort",
            "drug_interaction",
            "Induces CYP3A4, lowering levels of many prescription drugs",
            Severity::High,
        ),
        KnownRisk::new(
            "grapefruit",
            "drug_interaction",
            "Furanocoumarins inhibit CYP3A4 and raise levels of statins and calcium channel blockers",
            Severity::Moderate,
        ),
        KnownRisk::new(
            "glycyrrhizin",
            "cardiovascular",
            "Licorice-derived glycyrrhizin raises blood pressure and lowers potassium",
            Severity::Moderate,
        ),
        KnownRisk::new(
            "retinol",
            "toxicity",
            "Preformed vitamin A is teratogenic at high intake",
            Severity::High,
        ),
        KnownRisk::new(
            "caffeine",
            "stimulant",
            "Raises heart rate and may disturb sleep",
            Severity::Low,
        ),
        KnownRisk::new(
            "omega-3",
            "bleeding",
            "High intake may prolong bleeding time",
            Severity::Low,
        ),
    ]
}
