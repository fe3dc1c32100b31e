//! Nourish Gatekeeper
//!
//! Decides whether a claim may be asserted to the user.
//!
//! The Gatekeeper provides:
//! - Mechanism chain validation with weakest-link confidence
//! - Risk assessment that keeps "unknown" apart from "none found"
//! - Applicability matching against the user's known context
//! - The recommendation gate cascade
//!
//! # Examples
//!
//! ```
//! use nourish_domain::{ApplicabilityProfile, ClaimKind, Decision, UserContext};
//! use nourish_gatekeeper::{GateInput, Gatekeeper};
//!
//! let gatekeeper = Gatekeeper::default_config();
//! let report = gatekeeper.review(
//!     GateInput {
//!         kind: ClaimKind::Explanatory,
//!         mechanism: &[],
//!         compounds: &[],
//!         profile: &ApplicabilityProfile::default(),
//!         coverage_score: 0.0,
//!     },
//!     &UserContext::default(),
//! );
//! assert_eq!(report.recommendation.decision, Decision::Allow);
//! ```

#![warn(missing_docs)]

mod applicability;
mod config;
mod error;
mod gate;
mod mechanism;
mod risk;

pub use applicability::{compute_match, ApplicabilityMatch, Dimension};
pub use config::GatekeeperConfig;
pub use error::GatekeeperError;
pub use gate::{decide, GateInput, GateReport, Gatekeeper};
pub use mechanism::{allowed_sources, allowed_successors, validate_chain};
pub use risk::{KnownRisk, RiskAssessment, RiskEngine, RiskFlag, Severity};
