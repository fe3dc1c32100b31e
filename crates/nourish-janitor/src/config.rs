//! Configuration for session resets
//!
//! Defines the inactivity gaps after which a session's confidences decay or
//! its belief state is cleared, and the phrases that signal a topic shift.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the session reset policy
///
/// # Examples
///
/// ```
/// use nourish_janitor::ResetConfig;
///
/// // Default configuration (balanced)
/// let config = ResetConfig::default();
/// assert_eq!(config.decay_after_secs, 1800);
///
/// // Aggressive resets
/// let config = ResetConfig::aggressive();
/// assert_eq!(config.decay_after_secs, 600);
///
/// // Lenient resets
/// let config = ResetConfig::lenient();
/// assert_eq!(config.decay_after_secs, 7200);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetConfig {
    /// Inactivity gap after which prior confidences decay (in seconds)
    /// Default: 1800 (30 minutes)
    pub decay_after_secs: u64,

    /// Multiplicative factor applied to prior confidences on decay
    /// Default: 0.5
    pub decay_factor: f64,

    /// Inactivity gap after which the belief state is cleared (in seconds)
    /// Default: 86400 (one day)
    pub clear_after_secs: u64,

    /// Phrases that mark an explicit change of topic (matched case-insensitively)
    #[serde(default = "default_topic_shift_phrases")]
    pub topic_shift_phrases: Vec<String>,

    /// Dry-run mode: log what would be reset without touching sessions
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,
}

fn default_topic_shift_phrases() -> Vec<String> {
    [
        "new topic",
        "different question",
        "something else",
        "change of subject",
        "changing the subject",
        "unrelated question",
        "let's start over",
        "start over",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for ResetConfig {
    /// Balanced resets
    ///
    /// - Decay: after 30 minutes idle, halving confidences
    /// - Clear: after one day idle
    fn default() -> Self {
        Self {
            decay_after_secs: 1800,
            decay_factor: 0.5,
            clear_after_secs: 86_400,
            topic_shift_phrases: default_topic_shift_phrases(),
            dry_run: false,
        }
    }
}

impl ResetConfig {
    /// Aggressive resets (short gaps, steep decay)
    ///
    /// - Decay: after 10 minutes idle, to a quarter
    /// - Clear: after 6 hours idle
    pub fn aggressive() -> Self {
        Self {
            decay_after_secs: 600,
            decay_factor: 0.25,
            clear_after_secs: 6 * 3600,
            ..Self::default()
        }
    }

    /// Lenient resets (long gaps, gentle decay)
    ///
    /// - Decay: after 2 hours idle, to three quarters
    /// - Clear: after 7 days idle
    pub fn lenient() -> Self {
        Self {
            decay_after_secs: 7200,
            decay_factor: 0.75,
            clear_after_secs: 7 * 86_400,
            ..Self::default()
        }
    }

    /// Get the decay gap as Duration
    pub fn decay_after(&self) -> Duration {
        Duration::from_secs(self.decay_after_secs)
    }

    /// Get the clear gap as Duration
    pub fn clear_after(&self) -> Duration {
        Duration::from_secs(self.clear_after_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.decay_factor) {
            return Err("decay_factor must be within [0, 1]".to_string());
        }
        if self.decay_after_secs == 0 {
            return Err("decay_after_secs must be positive".to_string());
        }
        if self.clear_after_secs <= self.decay_after_secs {
            return Err("clear_after_secs must exceed decay_after_secs".to_string());
        }
        if self.topic_shift_phrases.iter().any(|p| p.trim().is_empty()) {
            return Err("topic_shift_phrases must not contain empty phrases".to_string());
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
