//! Nourish Janitor
//!
//! Session reset policy and the sweeper that applies it to stored sessions.
//!
//! # Overview
//!
//! Belief state is never destroyed mid-session by the rest of the system.
//! The Janitor is the only component allowed to age it:
//! - **Decay**: after an inactivity gap, or when the user explicitly changes
//!   topic, every prior confidence is multiplied by a fixed factor
//! - **Clear**: after a much longer gap, the belief state is forgotten
//!   (session id, creation time and turn counter survive)
//! - **Sweep**: every session in a [`SessionStore`](nourish_belief::SessionStore)
//!   is evaluated at a given time, with [`JanitorMetrics`] kept per sweep
//!
//! # Usage
//!
//! ```
//! use nourish_belief::BeliefState;
//! use nourish_domain::SessionId;
//! use nourish_janitor::{ResetAction, SessionResetPolicy};
//!
//! let policy = SessionResetPolicy::default();
//! let mut state = BeliefState::new(SessionId::new(), 0);
//!
//! assert_eq!(policy.reset(&mut state, 60, Some("new topic please")), ResetAction::Decay);
//! assert_eq!(policy.reset(&mut state, 200_000, None), ResetAction::Clear);
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [reset]
//! decay_after_secs = 1800
//! decay_factor = 0.5
//! clear_after_secs = 86400
//! topic_shift_phrases = ["new topic", "something else"]
//! dry_run = false
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod janitor;
mod metrics;
mod policy;

pub use config::ResetConfig;
pub use error::JanitorError;
pub use janitor::Janitor;
pub use metrics::JanitorMetrics;
pub use policy::{ResetAction, SessionResetPolicy};
