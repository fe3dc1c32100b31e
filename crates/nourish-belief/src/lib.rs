//! Nourish Belief State
//!
//! Per-session epistemic memory and the logic that keeps decisions stable
//! across turns:
//!
//! - [`BeliefState`]: what is known about the user, when it was learned,
//!   and what was previously decided for each claim
//! - Revision engine: [`detect_conflict`] / [`apply_revision`] classify new
//!   statements as UPDATE, CLARIFICATION or CONTRADICTION
//! - [`SaturationGuard`]: clarification budget and repeated-question blocking
//! - Comparator and explainer: [`compare`] diffs decisions against the prior
//!   turn; [`explain`] produces the mandatory [`ReversalExplanation`]
//! - [`SessionStore`]: caller-owned storage keyed by session id
//!
//! # Examples
//!
//! ```
//! use nourish_belief::{revise, BeliefState, FieldUpdate, RevisionKind};
//! use nourish_domain::SessionId;
//!
//! let mut state = BeliefState::new(SessionId::new(), 0);
//! revise(&mut state, &FieldUpdate::KnownConditions(vec!["IBS".into()]), 1);
//! let revision = revise(
//!     &mut state,
//!     &FieldUpdate::KnownConditions(vec!["IBS".into(), "Diabetes".into()]),
//!     2,
//! )
//! .unwrap();
//! assert_eq!(revision.kind, RevisionKind::Clarification);
//! ```

#![warn(missing_docs)]

mod comparator;
mod error;
mod field;
mod reversal;
mod revision;
mod saturation;
mod state;
mod store;

pub use comparator::{classify_change, compare};
pub use error::BeliefError;
pub use field::{BeliefField, FieldUpdate, FieldValue};
pub use reversal::{explain, ChangeTrigger, ReversalExplanation, ADDITIONAL_CONTEXT};
pub use revision::{apply_revision, detect_conflict, revise, BeliefRevision, RevisionKind};
pub use saturation::{QuestionVerdict, SaturationConfig, SaturationGuard};
pub use state::{BeliefState, PolicyRef, PriorDecision};
pub use store::{InMemorySessionStore, SessionStore};
