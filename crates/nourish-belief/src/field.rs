//! Updatable belief fields
//!
//! The closed set of facts the assistant may learn about a user. Each field
//! is either a scalar or a list; the revision engine's merge and compare
//! semantics depend on which.

use crate::BeliefError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Name of an updatable belief field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeliefField {
    /// Population the user belongs to
    Population,
    /// Dietary pattern
    DietaryPattern,
    /// Dose taken or intended
    DoseInfo,
    /// Known health conditions
    KnownConditions,
    /// Current medications
    Medications,
}

impl BeliefField {
    /// All fields
    pub const ALL: [BeliefField; 5] = [
        BeliefField::Population,
        BeliefField::DietaryPattern,
        BeliefField::DoseInfo,
        BeliefField::KnownConditions,
        BeliefField::Medications,
    ];

    /// Get the field name
    pub fn as_str(&self) -> &'static str {
        match self {
            BeliefField::Population => "population",
            BeliefField::DietaryPattern => "dietary_pattern",
            BeliefField::DoseInfo => "dose_info",
            BeliefField::KnownConditions => "known_conditions",
            BeliefField::Medications => "medications",
        }
    }

    /// Parse a field name; `dietary_context` is accepted for the diet field
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "dietary_context" => Some(BeliefField::DietaryPattern),
            other => Self::ALL.into_iter().find(|f| f.as_str() == other),
        }
    }

    /// Whether the field holds a list
    pub fn is_list(&self) -> bool {
        matches!(self, BeliefField::KnownConditions | BeliefField::Medications)
    }

    /// Scalar fields that describe who the user is; any change contradicts
    pub fn is_identity(&self) -> bool {
        matches!(self, BeliefField::Population | BeliefField::DietaryPattern)
    }
}

impl std::str::FromStr for BeliefField {
    type Err = BeliefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| BeliefError::UnknownField(s.to_string()))
    }
}

impl fmt::Display for BeliefField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value held by a belief field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Single value
    Scalar(String),
    /// Set-like list of values, in the order they were stated
    List(Vec<String>),
}

impl FieldValue {
    /// Items of a list value as a set (a scalar is a one-item set)
    pub fn as_set(&self) -> BTreeSet<&str> {
        match self {
            FieldValue::Scalar(s) => BTreeSet::from([s.as_str()]),
            FieldValue::List(items) => items.iter().map(String::as_str).collect(),
        }
    }

    /// The value as a single string (list items joined with ", ")
    pub fn to_scalar(&self) -> String {
        match self {
            FieldValue::Scalar(s) => s.clone(),
            FieldValue::List(items) => items.join(", "),
        }
    }

    /// The value as a list (a scalar becomes one item)
    pub fn to_list(&self) -> Vec<String> {
        match self {
            FieldValue::Scalar(s) => vec![s.clone()],
            FieldValue::List(items) => items.clone(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Scalar(s) => f.write_str(s),
            FieldValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// A new value for one belief field, as stated by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldUpdate {
    /// New population
    Population(String),
    /// New dietary pattern
    DietaryPattern(String),
    /// New dose
    DoseInfo(String),
    /// Full list of known conditions
    KnownConditions(Vec<String>),
    /// Full list of medications
    Medications(Vec<String>),
}

impl FieldUpdate {
    /// Field being updated
    pub fn field(&self) -> BeliefField {
        match self {
            FieldUpdate::Population(_) => BeliefField::Population,
            FieldUpdate::DietaryPattern(_) => BeliefField::DietaryPattern,
            FieldUpdate::DoseInfo(_) => BeliefField::DoseInfo,
            FieldUpdate::KnownConditions(_) => BeliefField::KnownConditions,
            FieldUpdate::Medications(_) => BeliefField::Medications,
        }
    }

    /// The stated value
    pub fn value(&self) -> FieldValue {
        match self {
            FieldUpdate::Population(v) | FieldUpdate::DietaryPattern(v) | FieldUpdate::DoseInfo(v) => {
                FieldValue::Scalar(v.clone())
            }
            FieldUpdate::KnownConditions(v) | FieldUpdate::Medications(v) => FieldValue::List(v.clone()),
        }
    }

    /// Build an update from a field name and a free-form string
    ///
    /// List fields are split on commas; blank items are dropped.
    pub fn from_raw(field: BeliefField, raw: &str) -> Self {
        let list = || {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        };
        let scalar = || raw.trim().to_string();
        match field {
            BeliefField::Population => FieldUpdate::Population(scalar()),
            BeliefField::DietaryPattern => FieldUpdate::DietaryPattern(scalar()),
            BeliefField::DoseInfo => FieldUpdate::DoseInfo(scalar()),
            BeliefField::KnownConditions => FieldUpdate::KnownConditions(list()),
            BeliefField::Medications => FieldUpdate::Medications(list()),
        }
    }
}
