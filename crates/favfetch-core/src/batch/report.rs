use std::fmt;

use super::plan::Plan;
use super::run::{IconOutcome, JobResult};

/// Counts for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub planned: usize,
    pub saved: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub skipped: usize,
    pub local: usize,
    pub without_icon: usize,
    /// Records whose icon reference was rewritten.
    pub patched: usize,
}

impl BatchReport {
    pub fn from_plan(plan: &Plan) -> Self {
        Self {
            planned: plan.jobs.len(),
            skipped: plan.skipped.len(),
            local: plan.local,
            without_icon: plan.without_icon,
            ..Self::default()
        }
    }

    pub fn record(&mut self, results: &[JobResult], patched: usize) {
        for r in results {
            match r.outcome {
                IconOutcome::Saved { .. } => self.saved += 1,
                IconOutcome::Unchanged { .. } => self.unchanged += 1,
                IconOutcome::Failed { .. } => self.failed += 1,
            }
        }
        self.patched = patched;
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} planned: {} saved, {} unchanged, {} failed, {} skipped; {} already local, {} without icon; {} record(s) updated",
            self.planned,
            self.saved,
            self.unchanged,
            self.failed,
            self.skipped,
            self.local,
            self.without_icon,
            self.patched
        )
    }
}
