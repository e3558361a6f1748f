//! `favfetch run` – download every remote favicon and patch the bookmarks file.

use anyhow::Result;
use favfetch_core::batch::{self, IconOutcome, RunSettings};
use favfetch_core::config::FavfetchConfig;

pub async fn run_batch(cfg: &FavfetchConfig, dry_run: bool) -> Result<()> {
    let mut settings = RunSettings::from_config(cfg);
    settings.dry_run = dry_run;

    let run = batch::fetch_and_patch(&settings, super::fetcher(cfg)).await?;

    if dry_run {
        for job in &run.plan.jobs {
            println!("would download {} to {}", job.url, settings.icon_dir.join(&job.file_name).display());
        }
    }
    for r in &run.results {
        match &r.outcome {
            IconOutcome::Saved { bytes } => {
                println!("Downloaded {} icon ({} bytes)", r.job.title, bytes)
            }
            IconOutcome::Unchanged { .. } => println!("{} icon unchanged", r.job.title),
            IconOutcome::Failed { reason, .. } => {
                println!("Failed to download {}: {}", r.job.url, reason)
            }
        }
    }
    println!("{}", run.report);
    if run.report.patched > 0 {
        println!(
            "Updated {} with local icon paths",
            settings.bookmarks_path.display()
        );
    }
    Ok(())
}
