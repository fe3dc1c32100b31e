//! Sweeps a session store for idle sessions

use crate::{JanitorError, JanitorMetrics, ResetAction, ResetConfig, SessionResetPolicy};
use nourish_belief::SessionStore;
use std::fmt::Display;
use tracing::info;

/// Applies the reset policy to every session in a store
///
/// # Examples
///
/// ```
/// use nourish_belief::{BeliefState, InMemorySessionStore, SessionStore};
/// use nourish_domain::SessionId;
/// use nourish_janitor::Janitor;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = InMemorySessionStore::new();
/// store.save(BeliefState::new(SessionId::from_value(1), 0))?;
///
/// let mut janitor = Janitor::default_config();
/// let metrics = janitor.sweep(&mut store, 100_000)?;
/// assert_eq!(metrics.cleared, 1);
/// println!("{}", metrics.summary());
/// # Ok(())
/// # }
/// ```
pub struct Janitor {
    policy: SessionResetPolicy,
    metrics: JanitorMetrics,
}

impl Janitor {
    /// Create a new Janitor with the given configuration
    pub fn new(config: ResetConfig) -> Result<Self, JanitorError> {
        Ok(Self {
            policy: SessionResetPolicy::new(config)?,
            metrics: JanitorMetrics::new(),
        })
    }

    /// Create a Janitor with default configuration
    pub fn default_config() -> Self {
        Self {
            policy: SessionResetPolicy::default(),
            metrics: JanitorMetrics::new(),
        }
    }

    /// Get the reset policy
    pub fn policy(&self) -> &SessionResetPolicy {
        &self.policy
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Evaluate every stored session at time `now`
    ///
    /// Idle sessions are decayed or cleared and saved back; untouched
    /// sessions are not rewritten. In dry-run mode nothing is saved.
    /// Returns the updated metrics after the sweep.
    pub fn sweep<S: SessionStore>(&mut self, store: &mut S, now: u64) -> Result<JanitorMetrics, JanitorError>
    where
        S::Error: Display,
    {
        let dry_run = self.policy.config().dry_run;
        let ids = store.session_ids().map_err(|e| JanitorError::Store(e.to_string()))?;

        for id in ids {
            let Some(mut state) = store.load(id).map_err(|e| JanitorError::Store(e.to_string()))? else {
                continue;
            };

            let action = self.policy.evaluate(&state, now, None);
            self.metrics.record(action, dry_run);
            if action == ResetAction::None {
                continue;
            }

            if dry_run {
                info!(session_id = %id, action = %action, "Dry-run: would reset session");
                continue;
            }

            self.policy.apply(&mut state, action, now);
            store.save(state).map_err(|e| JanitorError::Store(e.to_string()))?;
        }

        self.metrics.record_sweep();
        info!(
            examined = self.metrics.examined,
            decayed = self.metrics.decayed,
            cleared = self.metrics.cleared,
            "Janitor sweep complete"
        );

        Ok(self.metrics.clone())
    }
}
