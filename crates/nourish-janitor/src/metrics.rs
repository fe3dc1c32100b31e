//! Metrics collection for session sweeps

use crate::ResetAction;

/// Metrics collected during sweeps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JanitorMetrics {
    /// Sessions examined
    pub examined: usize,

    /// Sessions whose confidences were decayed
    pub decayed: usize,

    /// Sessions whose belief state was cleared
    pub cleared: usize,

    /// Sessions left untouched
    pub untouched: usize,

    /// Resets that were only logged (dry-run)
    pub skipped_dry_run: usize,

    /// Total sweep iterations completed
    pub sweep_count: usize,
}

impl JanitorMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for one session
    pub fn record(&mut self, action: ResetAction, dry_run: bool) {
        self.examined += 1;
        match action {
            ResetAction::None => self.untouched += 1,
            _ if dry_run => self.skipped_dry_run += 1,
            ResetAction::Decay => self.decayed += 1,
            ResetAction::Clear => self.cleared += 1,
        }
    }

    /// Record a sweep cycle completion
    pub fn record_sweep(&mut self) {
        self.sweep_count += 1;
    }

    /// Sessions actually reset
    pub fn total_reset(&self) -> usize {
        self.decayed + self.cleared
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Janitor Metrics Summary".to_string(),
            "======================".to_string(),
            format!("Sweep cycles: {}", self.sweep_count),
            format!("Sessions examined: {}", self.examined),
            format!("  Decayed: {}", self.decayed),
            format!("  Cleared: {}", self.cleared),
            format!("  Untouched: {}", self.untouched),
        ];
        if self.skipped_dry_run > 0 {
            lines.push(format!("  Dry-run (not applied): {}", self.skipped_dry_run));
        }
        lines.join("\n")
    }
}
