use std::fmt;

use tracing::{info, warn};

/// Result of one fill step. A step never aborts the run; failures are
/// downgraded to an `Outcome` and kept in the [`FillReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied(String),
    Skipped(String),
    Failed(String),
}

impl Outcome {
    pub fn applied(detail: impl Into<String>) -> Self {
        Outcome::Applied(detail.into())
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Outcome::Skipped(reason.into())
    }

    pub fn failed(error: impl fmt::Display) -> Self {
        Outcome::Failed(error.to_string())
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn detail(&self) -> &str {
        match self {
            Outcome::Applied(s) | Outcome::Skipped(s) | Outcome::Failed(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub step: String,
    pub outcome: Outcome,
}

/// Ordered diagnostics collected over one fill run.
#[derive(Debug, Clone, Default)]
pub struct FillReport {
    diagnostics: Vec<Diagnostic>,
}

impl FillReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic and log it.
    pub fn record(&mut self, step: impl Into<String>, outcome: Outcome) {
        let step = step.into();
        match &outcome {
            Outcome::Applied(detail) => info!(step = %step, "{detail}"),
            Outcome::Skipped(reason) => warn!(step = %step, "skipped: {reason}"),
            Outcome::Failed(error) => warn!(step = %step, "failed: {error}"),
        }
        self.diagnostics.push(Diagnostic { step, outcome });
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn applied(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.outcome.is_applied())
    }

    pub fn skipped(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.outcome.is_skipped())
    }

    pub fn failed(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.outcome.is_failed())
    }

    /// Last outcome recorded for `step`.
    pub fn outcome_for(&self, step: &str) -> Option<&Outcome> {
        self.diagnostics
            .iter()
            .rev()
            .find(|d| d.step == step)
            .map(|d| &d.outcome)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} applied, {} skipped, {} failed",
            self.applied().count(),
            self.skipped().count(),
            self.failed().count()
        )
    }
}
