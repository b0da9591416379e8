use serde::Serialize;
use std::fmt;

/// Per-run import counters.
///
/// Values are immutable: each processed record yields a new outcome via
/// [`ImportOutcome::with_success`] or [`ImportOutcome::with_error`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    pub success: usize,
    pub errors: usize,
}

impl ImportOutcome {
    #[must_use]
    pub fn with_success(self) -> Self {
        Self {
            success: self.success + 1,
            ..self
        }
    }

    #[must_use]
    pub fn with_error(self) -> Self {
        Self {
            errors: self.errors + 1,
            ..self
        }
    }

    pub fn total(&self) -> usize {
        self.success + self.errors
    }
}

impl fmt::Display for ImportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} réussis, {} erreurs", self.success, self.errors)
    }
}

/// Aggregate result of one sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub signalements: ImportOutcome,
    pub total: usize,
}

impl From<ImportOutcome> for SyncReport {
    fn from(outcome: ImportOutcome) -> Self {
        Self {
            signalements: outcome,
            total: outcome.total(),
        }
    }
}

/// Document counts of the two source collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub users_count: u64,
    pub signalements_count: u64,
}
