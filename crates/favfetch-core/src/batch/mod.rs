//! Batch fetch-and-patch over a bookmarks file.
//!
//! Load the collection, plan one job per distinct remote icon, run all jobs
//! concurrently, patch the records whose download succeeded, and save the
//! file once. Per-icon failures are logged and counted, never fatal.

mod apply;
mod plan;
mod report;
mod run;
mod single;

pub use apply::apply;
pub use plan::{plan, IconJob, Plan, RecordPos, SkipReason, SkippedItem};
pub use report::BatchReport;
pub use run::{run_batch, IconOutcome, JobResult};
pub use single::{fetch_one, SingleRequest, SingleResult};

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use crate::bookmarks;
use crate::config::{FavfetchConfig, IconOverride};
use crate::fetch::IconFetcher;
use crate::naming::IconNaming;

/// Explicit inputs for a run; nothing is derived from the executable's location.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub bookmarks_path: PathBuf,
    pub icon_dir: PathBuf,
    pub naming: IconNaming,
    /// None = start every download at once.
    pub max_concurrent: Option<usize>,
    pub overrides: Vec<IconOverride>,
    /// Plan only: no requests, no writes.
    pub dry_run: bool,
}

impl RunSettings {
    pub fn from_config(cfg: &FavfetchConfig) -> Self {
        Self {
            bookmarks_path: cfg.bookmarks_path.clone(),
            icon_dir: cfg.icon_dir.clone(),
            naming: cfg.naming(),
            max_concurrent: cfg.max_concurrent,
            overrides: cfg.overrides.clone(),
            dry_run: false,
        }
    }
}

/// Everything a caller may want to show after a run.
#[derive(Debug, Clone)]
pub struct BatchRun {
    pub report: BatchReport,
    pub plan: Plan,
    pub results: Vec<JobResult>,
}

/// Runs the whole fetch-and-patch pass described by `settings`.
///
/// Errors only for problems with the bookmarks file or the icon directory;
/// individual download failures end up in the report.
pub async fn fetch_and_patch(settings: &RunSettings, fetcher: Arc<IconFetcher>) -> Result<BatchRun> {
    let mut collection = bookmarks::load(&settings.bookmarks_path)?;
    let plan = plan(&collection, &settings.naming, &settings.overrides);
    let mut report = BatchReport::from_plan(&plan);
    tracing::info!(
        planned = plan.jobs.len(),
        local = plan.local,
        "loaded {}",
        settings.bookmarks_path.display()
    );

    if settings.dry_run {
        return Ok(BatchRun {
            report,
            plan,
            results: Vec::new(),
        });
    }

    std::fs::create_dir_all(&settings.icon_dir)
        .with_context(|| format!("create icon dir {}", settings.icon_dir.display()))?;

    let results = run_batch(
        plan.jobs.clone(),
        fetcher,
        &settings.icon_dir,
        settings.max_concurrent,
    )
    .await;

    let patched = apply(&mut collection, &results);
    report.record(&results, patched);

    if patched > 0 {
        bookmarks::save(&settings.bookmarks_path, &collection)?;
        tracing::info!("updated {} with local icon paths", settings.bookmarks_path.display());
    } else {
        tracing::info!("no icon references changed; {} left as-is", settings.bookmarks_path.display());
    }

    Ok(BatchRun {
        report,
        plan,
        results,
    })
}
