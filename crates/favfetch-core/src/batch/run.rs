//! Launch every planned download concurrently and wait for all to settle.
//!
//! Curl transfers are blocking, so each one runs on the tokio blocking pool.
//! With no cap every job is started at once; with a cap, a new job starts as
//! soon as one finishes. A failed job never stops the others.

use std::path::Path;
use std::sync::Arc;

use crate::fetch::{FetchError, FetchStatus, IconFetcher};

use super::plan::IconJob;

/// How one job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconOutcome {
    Saved { bytes: u64 },
    Unchanged { bytes: u64 },
    Failed { reason: String, status: Option<u32> },
}

impl IconOutcome {
    /// True when the icon file is in place and the records may be patched.
    pub fn is_success(&self) -> bool {
        !matches!(self, IconOutcome::Failed { .. })
    }

    fn from_fetch(job: &IconJob, res: Result<FetchStatus, FetchError>) -> Self {
        match res {
            Ok(FetchStatus::Saved { bytes }) => {
                tracing::info!(title = %job.title, bytes, "downloaded {} to {}", job.url, job.file_name);
                IconOutcome::Saved { bytes }
            }
            Ok(FetchStatus::Unchanged { bytes }) => {
                tracing::debug!(title = %job.title, bytes, "{} unchanged", job.file_name);
                IconOutcome::Unchanged { bytes }
            }
            Err(e) => {
                tracing::warn!(title = %job.title, "failed to download {}: {}", job.url, e);
                IconOutcome::Failed {
                    status: e.status(),
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    pub job: IconJob,
    pub outcome: IconOutcome,
}

/// Runs all `jobs`, saving each icon into `icon_dir`.
///
/// `max_concurrent = None` starts every download immediately. Results come
/// back in the same order as `jobs`.
pub async fn run_batch(
    jobs: Vec<IconJob>,
    fetcher: Arc<IconFetcher>,
    icon_dir: &Path,
    max_concurrent: Option<usize>,
) -> Vec<JobResult> {
    let cap = max_concurrent.unwrap_or(usize::MAX).max(1);
    let mut slots: Vec<Option<IconOutcome>> = vec![None; jobs.len()];
    let mut join_set = tokio::task::JoinSet::new();
    let mut next = 0usize;

    loop {
        while join_set.len() < cap && next < jobs.len() {
            let idx = next;
            next += 1;
            let job = &jobs[idx];
            let fetcher = Arc::clone(&fetcher);
            let url = job.url.clone();
            let headers = job.headers.clone();
            let target = icon_dir.join(&job.file_name);
            tracing::debug!("downloading {} to {}", url, target.display());
            join_set.spawn_blocking(move || (idx, fetcher.fetch_to_path(&url, &headers, &target)));
        }

        let Some(res) = join_set.join_next().await else {
            break;
        };
        match res {
            Ok((idx, fetched)) => slots[idx] = Some(IconOutcome::from_fetch(&jobs[idx], fetched)),
            Err(e) => tracing::error!("icon download task: {}", e),
        }
    }

    jobs.into_iter()
        .zip(slots)
        .map(|(job, outcome)| JobResult {
            outcome: outcome.unwrap_or_else(|| IconOutcome::Failed {
                reason: "download task aborted".to_string(),
                status: None,
            }),
            job,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn job(title: &str) -> IconJob {
        IconJob {
            title: title.to_string(),
            url: "https://example.com/favicon.ico".to_string(),
            file_name: format!("{}.ico", title),
            relative_path: format!("./assets/icons/{}.ico", title),
            headers: HashMap::new(),
            records: vec![(0, 0)],
        }
    }

    #[test]
    fn outcome_success_flags() {
        assert!(IconOutcome::Saved { bytes: 1 }.is_success());
        assert!(IconOutcome::Unchanged { bytes: 1 }.is_success());
        assert!(!IconOutcome::Failed {
            reason: "HTTP 404".into(),
            status: Some(404)
        }
        .is_success());
    }

    #[test]
    fn from_fetch_keeps_http_status() {
        let o = IconOutcome::from_fetch(&job("a"), Err(FetchError::Http(404)));
        assert_eq!(
            o,
            IconOutcome::Failed {
                reason: "HTTP 404".to_string(),
                status: Some(404)
            }
        );
    }

    #[tokio::test]
    async fn empty_batch_returns_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_batch(Vec::new(), Arc::new(IconFetcher::default()), dir.path(), None).await;
        assert!(out.is_empty());
    }
}
