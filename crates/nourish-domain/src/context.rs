//! User context and claim applicability profiles

use serde::{Deserialize, Serialize};

/// Population assumed when nothing more specific is known about the user
pub const DEFAULT_POPULATION: &str = "general";

/// What is currently known about the user, as seen by the applicability matcher
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    /// Population the user belongs to (e.g. "pregnant", "older_adult")
    #[serde(default)]
    pub population: Option<String>,

    /// Dietary pattern (e.g. "vegan", "mediterranean")
    #[serde(default)]
    pub dietary_context: Option<String>,

    /// Dose the user takes or intends to take
    #[serde(default)]
    pub dose_info: Option<String>,
}

/// Population, diet and dose constraints under which a claim was established
///
/// A profile with no constraints applies to everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicabilityProfile {
    /// Studied population
    #[serde(default)]
    pub population: Option<String>,

    /// Dietary context of the studies
    #[serde(default)]
    pub dietary_context: Option<String>,

    /// Dose range studied
    #[serde(default)]
    pub dose: Option<String>,
}

impl ApplicabilityProfile {
    /// Whether the profile declares no constraint at all
    pub fn is_empty(&self) -> bool {
        self.population.is_none() && self.dietary_context.is_none() && self.dose.is_none()
    }
}
