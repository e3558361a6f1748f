//! `favfetch plan` – list the downloads a run would perform.

use anyhow::Result;
use favfetch_core::batch::{self, SkipReason};
use favfetch_core::bookmarks;
use favfetch_core::config::FavfetchConfig;

pub fn run_plan(cfg: &FavfetchConfig) -> Result<()> {
    let collection = bookmarks::load(&cfg.bookmarks_path)?;
    let plan = batch::plan(&collection, &cfg.naming(), &cfg.overrides);

    if plan.jobs.is_empty() {
        println!("Nothing to download.");
    }
    for job in &plan.jobs {
        println!("{}\t{}\t{}", job.title, job.url, job.relative_path);
    }
    for s in &plan.skipped {
        let (c, i) = s.record;
        match &s.reason {
            SkipReason::MissingTitle => println!("skip [{}:{}]: no title", c, i),
            SkipReason::DuplicateFileName {
                file_name,
                first_title,
            } => println!(
                "skip [{}:{}]: {} already used by {:?}",
                c, i, file_name, first_title
            ),
        }
    }
    println!(
        "{} to download, {} already local, {} without icon",
        plan.jobs.len(),
        plan.local,
        plan.without_icon
    );
    Ok(())
}
