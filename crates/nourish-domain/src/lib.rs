//! Nourish Domain Layer
//!
//! This crate contains the data model shared by every part of the nutrition
//! trust layer. It holds value objects only: no scoring, no gating, no session
//! logic. Everything here is serializable as a plain structured record so it
//! can cross the boundary to retrieval, persistence and transport
//! collaborators.
//!
//! ## Key Concepts
//!
//! - **Claim**: an atomic assertion about a compound or food, subject to verification
//! - **Evidence record**: one structured citation supporting or contradicting a claim
//! - **Evidence set**: the frozen, owned collection of records judged for one claim
//! - **Mechanism step**: one link of a compound → interaction → physiology → outcome chain
//! - **Decision**: ALLOW / WITHHOLD / REQUIRE_MORE_CONTEXT with a reason code
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture:
//! - Only `uuid` and `serde` as external dependencies
//! - No I/O, no clocks, no randomness
//! - Services live in the policy, gatekeeper, belief and engine crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod context;
pub mod decision;
pub mod evidence;
pub mod ids;
pub mod mechanism;

// Re-exports for convenience
pub use claim::{ClaimInput, ClaimKind};
pub use context::{ApplicabilityProfile, UserContext, DEFAULT_POPULATION};
pub use decision::{
    ChangeType, Decision, DecisionDelta, EvidenceStrength, ReasonCode, RecommendationResult,
};
pub use evidence::{EffectDirection, EvidenceRecord, EvidenceSet, ForeignEvidence, StudyType};
pub use ids::{ClaimId, SessionId};
pub use mechanism::{BreakReason, MechanismChain, MechanismStep, SourceKind, StepType};
