//! Applicability matching
//!
//! Compares the conditions a claim was established under with what is known
//! about the user. A declared dimension the user has said nothing about is a
//! missing field, not a mismatch.

use nourish_domain::{ApplicabilityProfile, UserContext};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Constraint dimension of an applicability profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Studied population
    Population,
    /// Dietary context
    DietaryContext,
    /// Dose
    Dose,
}

impl Dimension {
    /// Whether a missing value for this dimension blocks a recommendation
    pub fn is_critical(&self) -> bool {
        matches!(self, Dimension::Population | Dimension::Dose)
    }

    /// Get the dimension name
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Population => "population",
            Dimension::DietaryContext => "dietary_context",
            Dimension::Dose => "dose",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How well a claim's profile fits the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicabilityMatch {
    /// Every declared dimension matched
    pub exact_match: bool,
    /// At least one, but not every, declared dimension matched
    pub partial_match: bool,
    /// Matched dimensions / declared dimensions
    pub confidence: f64,
    /// Dimensions that matched
    pub matched: Vec<Dimension>,
    /// Dimensions where the user's value differs
    pub mismatched: Vec<Dimension>,
    /// Declared dimensions the user has not provided
    pub missing_fields: Vec<Dimension>,
}

impl ApplicabilityMatch {
    /// Whether population or dose is among the missing fields
    pub fn has_missing_critical_field(&self) -> bool {
        self.missing_fields.iter().any(Dimension::is_critical)
    }

    /// Neither exact nor partial: every declared dimension was checked and none matched
    pub fn is_no_match(&self) -> bool {
        !self.exact_match && !self.partial_match
    }
}

/// Score how well `profile` applies to the user
pub fn compute_match(profile: &ApplicabilityProfile, context: &UserContext) -> ApplicabilityMatch {
    if profile.is_empty() {
        return ApplicabilityMatch {
            exact_match: true,
            partial_match: false,
            confidence: 1.0,
            matched: Vec::new(),
            mismatched: Vec::new(),
            missing_fields: Vec::new(),
        };
    }

    let dimensions = [
        (Dimension::Population, &profile.population, &context.population),
        (Dimension::DietaryContext, &profile.dietary_context, &context.dietary_context),
        (Dimension::Dose, &profile.dose, &context.dose_info),
    ];

    let mut matched = Vec::new();
    let mut mismatched = Vec::new();
    let mut missing_fields = Vec::new();
    let mut declared = 0usize;

    for (dimension, required, known) in dimensions {
        let Some(required) = required else { continue };
        declared += 1;
        match known {
            None => missing_fields.push(dimension),
            Some(known) if same_value(required, known) => matched.push(dimension),
            Some(_) => mismatched.push(dimension),
        }
    }

    let confidence = matched.len() as f64 / declared as f64;
    ApplicabilityMatch {
        exact_match: matched.len() == declared,
        partial_match: !matched.is_empty() && matched.len() < declared,
        confidence,
        matched,
        mismatched,
        missing_fields,
    }
}

fn same_value(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
