//! Belief revision
//!
//! Classifies a newly stated value against what the session already
//! believes:
//!
//! - no prior value → UPDATE
//! - identical value → no revision
//! - list field, new value a superset of the old → CLARIFICATION
//! - list field, anything else → CONTRADICTION
//! - population or dietary pattern changed → CONTRADICTION
//! - dose changed → UPDATE
//!
//! List comparison is plain string-set containment. A synonym or a re-worded
//! condition reads as a contradiction; this is a known source of false
//! positives.

use crate::{BeliefField, BeliefState, FieldUpdate, FieldValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Classification of a belief revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevisionKind {
    /// First value, or a non-identity value replaced
    Update,
    /// More detail added to a list
    Clarification,
    /// Earlier statement withdrawn or changed
    Contradiction,
}

impl RevisionKind {
    /// Get the kind name
    pub fn as_str(&self) -> &'static str {
        match self {
            RevisionKind::Update => "UPDATE",
            RevisionKind::Clarification => "CLARIFICATION",
            RevisionKind::Contradiction => "CONTRADICTION",
        }
    }
}

impl fmt::Display for RevisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected change to one belief field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeliefRevision {
    /// Field revised
    pub field: BeliefField,
    /// Value before the revision
    pub old_value: Option<FieldValue>,
    /// Value after the revision
    pub new_value: FieldValue,
    /// Turn the revision was detected in
    pub turn: u32,
    /// Classification
    pub kind: RevisionKind,
}

/// Compare a stated value with the current belief
///
/// Returns `None` when the value is already known.
pub fn detect_conflict(state: &BeliefState, update: &FieldUpdate, turn: u32) -> Option<BeliefRevision> {
    let field = update.field();
    let new_value = update.value();
    let old_value = state.value_of(field);

    let kind = match &old_value {
        None => RevisionKind::Update,
        Some(old) if *old == new_value => return None,
        Some(old) => classify(field, old, &new_value),
    };

    Some(BeliefRevision {
        field,
        old_value,
        new_value,
        turn,
        kind,
    })
}

fn classify(field: BeliefField, old: &FieldValue, new: &FieldValue) -> RevisionKind {
    if field.is_list() {
        if new.as_set().is_superset(&old.as_set()) {
            RevisionKind::Clarification
        } else {
            RevisionKind::Contradiction
        }
    } else if field.is_identity() {
        RevisionKind::Contradiction
    } else {
        RevisionKind::Update
    }
}

/// Apply a detected revision to the state
///
/// A contradiction marks the field superseded before its value is
/// overwritten. Every revision stamps the field with its turn.
pub fn apply_revision(state: &mut BeliefState, revision: BeliefRevision) {
    if revision.kind == RevisionKind::Contradiction {
        state.mark_superseded(revision.field);
    }

    info!(
        session_id = %state.session_id(),
        field = %revision.field,
        kind = %revision.kind,
        turn = revision.turn,
        "Belief revised"
    );
    state.write_field(revision);
}

/// Detect and apply in one step, returning the revision if there was one
pub fn revise(state: &mut BeliefState, update: &FieldUpdate, turn: u32) -> Option<BeliefRevision> {
    let revision = detect_conflict(state, update, turn)?;
    apply_revision(state, revision.clone());
    Some(revision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fixtures::state;

    fn conditions(items: &[&str]) -> FieldUpdate {
        FieldUpdate::KnownConditions(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_first_value_is_update() {
        let state = state();
        let revision = detect_conflict(&state, &conditions(&["IBS"]), 1).unwrap();
        assert_eq!(revision.kind, RevisionKind::Update);
        assert_eq!(revision.old_value, None);
    }

    #[test]
    fn test_same_value_is_no_revision() {
        let mut state = state();
        revise(&mut state, &FieldUpdate::Population("adult".to_string()), 1);
        assert!(detect_conflict(&state, &FieldUpdate::Population("adult".to_string()), 2).is_none());
    }

    #[test]
    fn test_list_superset_is_clarification() {
        let mut state = state();
        revise(&mut state, &conditions(&["IBS"]), 1);

        let revision = revise(&mut state, &conditions(&["IBS", "Diabetes"]), 2).unwrap();
        assert_eq!(revision.kind, RevisionKind::Clarification);
        assert!(!state.is_superseded(BeliefField::KnownConditions));
        assert_eq!(state.known_conditions(), ["IBS", "Diabetes"]);
    }

    #[test]
    fn test_list_shrink_is_contradiction() {
        let mut state = state();
        revise(&mut state, &conditions(&["IBS", "Diabetes"]), 1);

        let revision = revise(&mut state, &conditions(&["Diabetes"]), 3).unwrap();
        assert_eq!(revision.kind, RevisionKind::Contradiction);
        assert!(state.is_superseded(BeliefField::KnownConditions));
        assert_eq!(state.learned_at(BeliefField::KnownConditions), Some(3));
        assert_eq!(state.known_conditions(), ["Diabetes"]);
    }

    #[test]
    fn test_list_reorder_is_clarification() {
        let mut state = state();
        revise(&mut state, &conditions(&["IBS", "Diabetes"]), 1);
        let revision = detect_conflict(&state, &conditions(&["Diabetes", "IBS"]), 2).unwrap();
        assert_eq!(revision.kind, RevisionKind::Clarification);
    }

    #[test]
    fn test_synonym_reads_as_contradiction() {
        let mut state = state();
        revise(&mut state, &conditions(&["type 2 diabetes"]), 1);
        let revision = detect_conflict(&state, &conditions(&["T2D"]), 2).unwrap();
        assert_eq!(revision.kind, RevisionKind::Contradiction);
    }

    #[test]
    fn test_identity_change_is_contradiction() {
        let mut state = state();
        revise(&mut state, &FieldUpdate::DietaryPattern("vegan".to_string()), 1);
        let revision = revise(&mut state, &FieldUpdate::DietaryPattern("pescatarian".to_string()), 2).unwrap();
        assert_eq!(revision.kind, RevisionKind::Contradiction);
        assert_eq!(revision.old_value, Some(FieldValue::Scalar("vegan".to_string())));
        assert!(state.is_superseded(BeliefField::DietaryPattern));
    }

    #[test]
    fn test_dose_change_is_update() {
        let mut state = state();
        revise(&mut state, &FieldUpdate::DoseInfo("500mg".to_string()), 1);
        let revision = revise(&mut state, &FieldUpdate::DoseInfo("1g".to_string()), 2).unwrap();
        assert_eq!(revision.kind, RevisionKind::Update);
        assert!(!state.is_superseded(BeliefField::DoseInfo));
        assert_eq!(state.dose_info(), Some("1g"));
    }

    #[test]
    fn test_revisions_are_logged_in_order() {
        let mut state = state();
        revise(&mut state, &conditions(&["IBS"]), 1);
        revise(&mut state, &FieldUpdate::Population("adult".to_string()), 2);
        revise(&mut state, &FieldUpdate::Population("pregnant".to_string()), 3);

        let kinds: Vec<_> = state.revisions().iter().map(|r| (r.field, r.kind, r.turn)).collect();
        assert_eq!(
            kinds,
            vec![
                (BeliefField::KnownConditions, RevisionKind::Update, 1),
                (BeliefField::Population, RevisionKind::Update, 2),
                (BeliefField::Population, RevisionKind::Contradiction, 3),
            ]
        );
    }
}
