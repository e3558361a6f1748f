//! Fetch one icon for one named item and patch every item with that title.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;

use crate::bookmarks;
use crate::fetch::IconFetcher;
use crate::naming::icon_file_stem;

use super::plan::IconJob;
use super::run::IconOutcome;
use super::RunSettings;

/// A single icon to fetch.
#[derive(Debug, Clone, Default)]
pub struct SingleRequest {
    /// Exact title of the item(s) to patch.
    pub title: String,
    pub url: String,
    /// File stem; defaults to the stem derived from `title`.
    pub name: Option<String>,
    /// Extra headers for this request only.
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleResult {
    pub file_name: String,
    pub relative_path: String,
    pub outcome: IconOutcome,
    /// Items whose icon reference was rewritten.
    pub patched: usize,
}

/// Downloads `req.url` into the icon dir and, on success, points every item
/// titled `req.title` at it. A failed download is reported, not returned as an error.
pub async fn fetch_one(
    settings: &RunSettings,
    fetcher: Arc<IconFetcher>,
    req: SingleRequest,
) -> Result<SingleResult> {
    let mut collection = bookmarks::load(&settings.bookmarks_path)?;
    std::fs::create_dir_all(&settings.icon_dir)
        .with_context(|| format!("create icon dir {}", settings.icon_dir.display()))?;

    let stem = req
        .name
        .clone()
        .unwrap_or_else(|| icon_file_stem(&req.title));
    let file_name = settings.naming.file_name(&stem);
    let relative_path = settings.naming.relative_path(&file_name);
    let job = IconJob {
        title: req.title.clone(),
        url: req.url.clone(),
        file_name: file_name.clone(),
        relative_path: relative_path.clone(),
        headers: req.headers,
        records: Vec::new(),
    };

    let results = super::run::run_batch(vec![job], fetcher, &settings.icon_dir, Some(1)).await;
    let outcome = results
        .into_iter()
        .next()
        .map(|r| r.outcome)
        .unwrap_or(IconOutcome::Failed {
            reason: "download task aborted".to_string(),
            status: None,
        });

    let mut patched = 0;
    if outcome.is_success() {
        let already = collection
            .items()
            .filter(|(_, _, i)| i.title() == Some(req.title.as_str()))
            .filter(|(_, _, i)| i.favicon() == Some(relative_path.as_str()))
            .count();
        let matched = collection.set_favicon_by_title(&req.title, &relative_path);
        patched = matched - already;
        if matched == 0 {
            tracing::warn!(title = %req.title, "no item with this title; bookmarks left as-is");
        } else if patched > 0 {
            bookmarks::save(&settings.bookmarks_path, &collection)?;
            tracing::info!(title = %req.title, "updated {} item(s) to {}", patched, relative_path);
        }
    }

    Ok(SingleResult {
        file_name,
        relative_path,
        outcome,
        patched,
    })
}
