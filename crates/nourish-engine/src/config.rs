//! Configuration for the turn engine

use nourish_belief::SaturationConfig;
use nourish_domain::EvidenceStrength;
use nourish_gatekeeper::GatekeeperConfig;
use nourish_janitor::ResetConfig;
use serde::{Deserialize, Serialize};

/// Configuration for the turn engine and every service it drives
///
/// Loadable from a single TOML file:
///
/// ```toml
/// strong_threshold = 0.7
/// moderate_threshold = 0.4
///
/// [gatekeeper]
/// unknown_risk_coverage_threshold = 0.5
/// default_population = "general"
///
/// [saturation]
/// max_clarifications = 2
/// similarity_threshold = 0.6
///
/// [reset]
/// decay_after_secs = 1800
/// decay_factor = 0.5
/// clear_after_secs = 86400
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Effective confidence at or above which evidence is STRONG
    pub strong_threshold: f64,

    /// Effective confidence at or above which evidence is MODERATE
    pub moderate_threshold: f64,

    /// Mechanism, risk and applicability settings
    pub gatekeeper: GatekeeperConfig,

    /// Clarification budget and repeat blocking
    pub saturation: SaturationConfig,

    /// Session decay and clearing
    pub reset: ResetConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strong_threshold: 0.7,
            moderate_threshold: 0.4,
            gatekeeper: GatekeeperConfig::default(),
            saturation: SaturationConfig::default(),
            reset: ResetConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Strict preset: higher bar for STRONG, fewer questions, faster decay
    pub fn strict() -> Self {
        Self {
            strong_threshold: 0.8,
            moderate_threshold: 0.5,
            gatekeeper: GatekeeperConfig::strict(),
            saturation: SaturationConfig::strict(),
            reset: ResetConfig::aggressive(),
        }
    }

    /// Lenient preset: lower bar for STRONG, more questions, slower decay
    pub fn lenient() -> Self {
        Self {
            strong_threshold: 0.6,
            moderate_threshold: 0.3,
            gatekeeper: GatekeeperConfig::lenient(),
            saturation: SaturationConfig::lenient(),
            reset: ResetConfig::lenient(),
        }
    }

    /// Classify an effective confidence
    pub fn strength_for(&self, confidence: f64) -> EvidenceStrength {
        if confidence >= self.strong_threshold {
            EvidenceStrength::Strong
        } else if confidence >= self.moderate_threshold {
            EvidenceStrength::Moderate
        } else {
            EvidenceStrength::Weak
        }
    }

    /// Validate the configuration, including every nested service config
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("strong_threshold", self.strong_threshold),
            ("moderate_threshold", self.moderate_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be within [0, 1]", name));
            }
        }
        if self.moderate_threshold >= self.strong_threshold {
            return Err("moderate_threshold must be below strong_threshold".to_string());
        }
        self.gatekeeper
            .validate()
            .map_err(|e| format!("gatekeeper: {}", e))?;
        self.saturation
            .validate()
            .map_err(|e| format!("saturation: {}", e))?;
        self.reset.validate().map_err(|e| format!("reset: {}", e))?;
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
