//! Session storage
//!
//! Belief states are owned by the caller and kept per session id. Access to
//! a single session must be serialized by the caller; the store itself only
//! maps ids to states.

use crate::BeliefState;
use nourish_domain::SessionId;
use std::collections::BTreeMap;
use std::convert::Infallible;

/// Trait for storing and retrieving session belief states
///
/// Implemented in memory here; durable implementations live with the
/// persistence collaborator.
pub trait SessionStore {
    /// Error type for store operations
    type Error;

    /// Get a session's state
    fn load(&self, id: SessionId) -> Result<Option<BeliefState>, Self::Error>;

    /// Insert or replace a session's state
    fn save(&mut self, state: BeliefState) -> Result<(), Self::Error>;

    /// Remove a session, returning its last state
    fn remove(&mut self, id: SessionId) -> Result<Option<BeliefState>, Self::Error>;

    /// All stored session ids
    fn session_ids(&self) -> Result<Vec<SessionId>, Self::Error>;
}

/// In-memory session store
#[derive(Debug, Default, Clone)]
pub struct InMemorySessionStore {
    sessions: BTreeMap<SessionId, BeliefState>,
}

impl InMemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    type Error = Infallible;

    fn load(&self, id: SessionId) -> Result<Option<BeliefState>, Self::Error> {
        Ok(self.sessions.get(&id).cloned())
    }

    fn save(&mut self, state: BeliefState) -> Result<(), Self::Error> {
        self.sessions.insert(state.session_id(), state);
        Ok(())
    }

    fn remove(&mut self, id: SessionId) -> Result<Option<BeliefState>, Self::Error> {
        Ok(self.sessions.remove(&id))
    }

    fn session_ids(&self) -> Result<Vec<SessionId>, Self::Error> {
        Ok(self.sessions.keys().copied().collect())
    }
}
