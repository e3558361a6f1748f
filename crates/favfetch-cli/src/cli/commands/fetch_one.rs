//! `favfetch fetch-one` – download a single icon for one named item.

use anyhow::Result;
use favfetch_core::batch::{self, IconOutcome, RunSettings, SingleRequest};
use favfetch_core::config::FavfetchConfig;

/// Parse a `Name: value` header argument.
pub fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected \"Name: value\", got {:?}", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in {:?}", s));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

pub async fn run_fetch_one(
    cfg: &FavfetchConfig,
    title: String,
    url: String,
    name: Option<String>,
    headers: Vec<(String, String)>,
) -> Result<()> {
    let settings = RunSettings::from_config(cfg);
    let req = SingleRequest {
        title,
        url,
        name,
        headers: headers.into_iter().collect(),
    };
    println!("Downloading {} for {:?}", req.url, req.title);
    let title = req.title.clone();

    let res = batch::fetch_one(&settings, super::fetcher(cfg), req).await?;

    match &res.outcome {
        IconOutcome::Saved { bytes } => println!(
            "Downloaded {} icon to {} ({} bytes)",
            title,
            settings.icon_dir.join(&res.file_name).display(),
            bytes
        ),
        IconOutcome::Unchanged { .. } => println!("{} icon unchanged", title),
        IconOutcome::Failed { reason, .. } => {
            println!("Failed to download {} icon: {}", title, reason)
        }
    }
    if res.patched > 0 {
        println!("Updated {} favicon path to {}", title, res.relative_path);
    }
    Ok(())
}
