//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use nourish_domain::{ChangeType, Decision};
use nourish_engine::TurnOutcome;
use nourish_janitor::ResetAction;
use nourish_policy::EvidencePolicy;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a verified policy.
    pub fn format_policy(&self, policy: &EvidencePolicy) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let governance = policy.governance();
                let summary = serde_json::json!({
                    "policy_id": policy.policy_id(),
                    "version": policy.version(),
                    "published_at": policy.published_at(),
                    "content_hash": policy.content_hash(),
                    "attestation": policy.attestation(),
                    "baseline_score": policy.baseline_score(),
                    "tiers": policy.tier_thresholds().len(),
                    "rules": policy.rules().iter().map(|r| &r.id).collect::<Vec<_>>(),
                    "author": governance.map(|g| g.author.as_str()),
                    "review_board": governance.map(|g| g.review_board.as_str()),
                    "approval_date": governance.map(|g| g.approval_date.as_str()),
                });
                Ok(serde_json::to_string_pretty(&summary)?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                builder.push_record(["Policy", policy.policy_id()]);
                builder.push_record(["Version", policy.version()]);
                builder.push_record(["Content hash", policy.content_hash()]);
                builder.push_record(["Baseline", &format!("{:.2}", policy.baseline_score())]);

                let tiers: Vec<String> = policy
                    .tier_thresholds()
                    .iter()
                    .map(|t| format!("{}>={:.2}", t.tier, t.min_score))
                    .collect();
                builder.push_record(["Tiers", &tiers.join(", ")]);

                let rules: Vec<String> = policy
                    .rules()
                    .iter()
                    .map(|r| format!("{} ({})", r.id, r.category))
                    .collect();
                builder.push_record(["Rules", &rules.join(", ")]);

                if let Some(governance) = policy.governance() {
                    builder.push_record(["Author", &governance.author]);
                    builder.push_record(["Review board", &governance.review_board]);
                    builder.push_record(["Approved", &governance.approval_date]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format a content hash.
    pub fn format_hash(&self, content_hash: &str) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "content_hash": content_hash,
                "attestation": nourish_policy::attestation_for(content_hash),
            }))?),
            OutputFormat::Table => Ok(content_hash.to_string()),
        }
    }

    /// Format the outcomes of a replayed transcript.
    pub fn format_outcomes(&self, outcomes: &[TurnOutcome]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(outcomes)?),
            OutputFormat::Table => {
                if outcomes.is_empty() {
                    return Ok(self.warning("No turns to evaluate."));
                }
                let sections: Vec<String> = outcomes.iter().map(|o| self.format_turn_table(o)).collect();
                Ok(sections.join("\n\n"))
            }
        }
    }

    fn format_turn_table(&self, outcome: &TurnOutcome) -> String {
        let mut lines = Vec::new();

        let mut header = format!("Turn {}", outcome.turn);
        if outcome.reset != ResetAction::None {
            header.push_str(&format!(" (session {})", outcome.reset));
        }
        lines.push(self.colorize(&header, "cyan"));

        for revision in &outcome.revisions {
            lines.push(self.info(&format!("{} {}", revision.kind, revision.field)));
        }

        if outcome.claims.is_empty() {
            lines.push(self.colorize("No claims this turn.", "yellow"));
        } else {
            let mut builder = Builder::default();
            builder.push_record([
                "Claim", "Decision", "Reason", "Score", "Tier", "Effective", "Strength", "Change",
            ]);
            for claim in &outcome.claims {
                let mut change = claim.delta.change.to_string();
                if claim.held {
                    change.push_str(" (held)");
                }
                builder.push_record([
                    claim.claim_id.as_str(),
                    &self.decision(claim.recommendation.decision),
                    claim.recommendation.reason.as_str(),
                    &format!("{:.2}", claim.breakdown.final_score),
                    &claim.breakdown.tier,
                    &format!("{:.2}", claim.effective_confidence),
                    claim.strength.as_str(),
                    &change,
                ]);
            }
            let mut table = builder.build();
            table
                .with(Style::rounded())
                .with(Modify::new(Rows::first()).with(Alignment::center()));
            lines.push(table.to_string());
        }

        for claim in &outcome.claims {
            if let Some(explanation) = &claim.explanation {
                if explanation.change != ChangeType::NewDecision {
                    lines.push(self.warning(&format!("{}: {}", claim.claim_id, explanation.render())));
                }
            }
        }

        if let Some(question) = &outcome.question {
            lines.push(self.colorize(&format!("? {}", question.text), "magenta"));
        }
        if outcome.saturated {
            lines.push(self.info("Clarification budget exhausted; holding decisions."));
        }

        lines.join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn decision(&self, decision: Decision) -> String {
        let color = match decision {
            Decision::Allow => "green",
            Decision::RequireMoreContext => "yellow",
            Decision::Withhold => "red",
        };
        self.colorize(decision.as_str(), color)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}
