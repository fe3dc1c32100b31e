//! Belief error types

use thiserror::Error;

/// Errors that can occur while handling belief state
#[derive(Error, Debug)]
pub enum BeliefError {
    /// Unrecognized belief field name
    #[error("Unknown belief field: {0}")]
    UnknownField(String),

    /// State could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}
