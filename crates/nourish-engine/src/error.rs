//! Error types for the turn engine

use nourish_domain::ForeignEvidence;
use nourish_gatekeeper::GatekeeperError;
use nourish_janitor::JanitorError;
use nourish_policy::PolicyError;
use thiserror::Error;

/// Errors that abort a turn
///
/// Every variant is a governance, integrity or caller failure. Thin
/// evidence, unknown risk and missing context are never errors; they are
/// routed through the gate as data.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Policy missing, corrupt or failing its own validation
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    /// A claim was handed evidence belonging to another claim
    #[error("Evidence/claim mismatch: {0}")]
    EvidenceClaimMismatch(#[from] ForeignEvidence),

    /// The registry recognised a claim but resolved no evidence for it
    #[error("Registry hit for claim '{0}' carries no evidence")]
    RegistryHitWithoutEvidence(String),

    /// Turns must be submitted in increasing order
    #[error("Turn {turn} is not after the session's current turn {current}")]
    OutOfOrderTurn {
        /// Submitted turn
        turn: u32,
        /// Session's current turn
        current: u32,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<GatekeeperError> for EngineError {
    fn from(e: GatekeeperError) -> Self {
        match e {
            GatekeeperError::Config(msg) => EngineError::Config(format!("gatekeeper: {}", msg)),
        }
    }
}

impl From<JanitorError> for EngineError {
    fn from(e: JanitorError) -> Self {
        match e {
            JanitorError::Config(msg) => EngineError::Config(format!("reset: {}", msg)),
            other => EngineError::Config(other.to_string()),
        }
    }
}
