//! Shared icon fetch helper.
//!
//! Every download goes through one `IconFetcher` configured with base headers,
//! timeouts, redirect handling and a retry policy. A body is streamed into a
//! temp file inside the target directory and only renamed onto the target
//! after a 200 completes, so a failed fetch never creates or truncates the
//! target file.

mod error;
mod transfer;

pub use error::FetchError;

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::checksum;
use crate::retry::{run_with_retry, RetryPolicy};

/// Request settings shared by all downloads of a run.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Headers sent with every request.
    pub headers: HashMap<String, String>,
    /// Connect timeout (None = curl default).
    pub connect_timeout: Option<Duration>,
    /// Whole-transfer timeout (None = no limit).
    pub timeout: Option<Duration>,
    /// Follow redirects before judging the status.
    pub follow_redirects: bool,
    pub retry: RetryPolicy,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            headers: HashMap::new(),
            connect_timeout: Some(Duration::from_secs(30)),
            timeout: Some(Duration::from_secs(60)),
            follow_redirects: true,
            retry: RetryPolicy::single_attempt(),
        }
    }
}

/// Result of a successful fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// New or changed content was written to the target.
    Saved { bytes: u64 },
    /// The target already held exactly these bytes; it was left untouched.
    Unchanged { bytes: u64 },
}

/// Merge per-request headers over base headers. Names compare case-insensitively;
/// the per-request value wins.
pub fn merge_headers(
    base: &HashMap<String, String>,
    extra: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut out: HashMap<String, String> = base
        .iter()
        .filter(|(k, _)| !extra.keys().any(|e| e.eq_ignore_ascii_case(k)))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    out.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    out
}

/// Blocking icon downloader. Cheap to clone; share one per run.
#[derive(Debug, Clone, Default)]
pub struct IconFetcher {
    options: FetchOptions,
}

impl IconFetcher {
    pub fn new(options: FetchOptions) -> Self {
        Self { options }
    }

    /// Downloads `url` to `target`, retrying per the configured policy.
    ///
    /// `extra_headers` are layered over the base headers. The parent directory
    /// of `target` must exist. Runs on the current thread; call from
    /// `spawn_blocking` in async code.
    pub fn fetch_to_path(
        &self,
        url: &str,
        extra_headers: &HashMap<String, String>,
        target: &Path,
    ) -> Result<FetchStatus, FetchError> {
        let headers = merge_headers(&self.options.headers, extra_headers);
        let dir = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        run_with_retry(&self.options.retry, || {
            let mut tmp = tempfile::Builder::new()
                .prefix(".favfetch-")
                .suffix(".part")
                .tempfile_in(dir)?;
            let bytes = transfer::get_into(url, &headers, &self.options, tmp.as_file_mut())?;

            if checksum::same_content(tmp.path(), target)? {
                return Ok(FetchStatus::Unchanged { bytes });
            }
            set_public_mode(tmp.as_file())?;
            tmp.persist(target).map_err(|e| FetchError::Storage(e.error))?;
            Ok(FetchStatus::Saved { bytes })
        })
    }
}

/// Temp files are created 0600; saved icons are served as static assets.
#[cfg(unix)]
fn set_public_mode(file: &std::fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_public_mode(_file: &std::fs::File) -> std::io::Result<()> {
    Ok(())
}
