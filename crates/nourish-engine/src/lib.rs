//! Nourish Engine
//!
//! The per-turn orchestrator of the trust layer.
//!
//! # Overview
//!
//! For every turn of a session the [`TurnEngine`]:
//!
//! 1. applies the session reset policy (decay on idle or topic shift, clear
//!    after a long gap) and advances the turn
//! 2. folds the user's stated context into the belief state, recording
//!    UPDATE / CLARIFICATION / CONTRADICTION revisions
//! 3. for each claim: freezes its evidence, runs the evidence policy, runs
//!    the gatekeeper (mechanism, risk, applicability, gate), classifies the
//!    evidence strength, applies the saturation hold, compares against the
//!    prior decision and explains any change
//! 4. proposes at most one clarifying question through the saturation guard
//!
//! # Architecture
//!
//! ```text
//! TurnInput → reset → revisions → [policy → gate → hold → compare → explain]* → question
//!                                                                               ↓
//!                                                      BeliefState (committed) + TurnOutcome
//! ```
//!
//! The whole cascade runs on a copy of the belief state; governance and
//! integrity failures abort the turn and leave the session untouched.
//!
//! # Example Usage
//!
//! ```no_run
//! use nourish_belief::BeliefState;
//! use nourish_domain::SessionId;
//! use nourish_engine::{EngineConfig, TurnEngine, TurnInput};
//! use nourish_policy::PolicyRegistry;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = PolicyRegistry::load_dir("policies")?;
//! let engine = TurnEngine::from_registry(&registry, "nutrition-evidence", "1.0.0", EngineConfig::default())?;
//!
//! let mut state = BeliefState::new(SessionId::new(), 1_772_323_200);
//! let outcome = engine.process_turn(&mut state, &TurnInput::new(1, 1_772_323_260))?;
//! for reversal in outcome.reversals() {
//!     println!("{}", reversal.render());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod questions;
mod types;

#[cfg(test)]
mod fixtures;

pub use config::EngineConfig;
pub use engine::TurnEngine;
pub use error::EngineError;
pub use questions::{question_for, ClarifyingQuestion, QuestionKind};
pub use types::{ClaimOutcome, TurnInput, TurnOutcome};
