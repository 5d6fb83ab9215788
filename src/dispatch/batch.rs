//! # Batch Submission
//!
//! Runs a file of form submissions concurrently. Every entry is launched
//! before any outcome is awaited, so slow requests do not hold up fast
//! ones; outcomes are applied in completion order.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use super::dispatcher::{Dispatcher, Outcome, Submission};
use super::forms::{FormFields, FormId};
use super::view::FormView;

/// One submission in a batch file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BatchEntry {
    pub form: FormId,
    #[serde(default)]
    pub fields: FormFields,
}

/// Tally of a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub rejected: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Delivered { .. } | Outcome::Listed { .. } => self.succeeded += 1,
            Outcome::Rejected(_) => self.rejected += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.rejected + self.failed
    }

    pub fn all_succeeded(&self) -> bool {
        self.rejected == 0 && self.failed == 0
    }
}

/// Parse a JSON array of batch entries
pub fn parse_batch(text: &str) -> Result<Vec<BatchEntry>> {
    serde_json::from_str(text).context("Batch file must be a JSON array of {form, fields} objects")
}

/// Read and parse a batch file
pub fn load_batch(path: &Path) -> Result<Vec<BatchEntry>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch file '{}'", path.display()))?;
    parse_batch(&text)
}

/// Launch every entry, then apply outcomes as they complete
pub async fn run_batch<V: FormView>(
    dispatcher: &mut Dispatcher<V>,
    entries: &[BatchEntry],
) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for entry in entries {
        if let Submission::Resolved(outcome) = dispatcher.execute_async(entry.form, &entry.fields) {
            summary.record(&outcome);
        }
    }
    tracing::debug!("Batch launched, {} requests in flight", dispatcher.in_flight());

    while let Some(outcome) = dispatcher.next_outcome().await {
        summary.record(&outcome);
    }

    tracing::info!(
        "Batch finished: {} succeeded, {} rejected, {} failed",
        summary.succeeded,
        summary.rejected,
        summary.failed
    );
    summary
}
