//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Policy integrity or governance failure
    #[error("Policy error: {0}")]
    Policy(#[from] nourish_policy::PolicyError),

    /// Turn processing failure
    #[error("Engine error: {0}")]
    Engine(#[from] nourish_engine::EngineError),

    /// Session file could not be read or written
    #[error("Session error: {0}")]
    Session(#[from] nourish_belief::BeliefError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
