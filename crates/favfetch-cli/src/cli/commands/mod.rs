//! CLI command handlers, one per file.

mod completions;
mod fetch_one;
mod plan;
mod run;

use favfetch_core::config::FavfetchConfig;
use favfetch_core::fetch::IconFetcher;
use std::sync::Arc;

pub use completions::run_completions;
pub use fetch_one::{parse_header, run_fetch_one};
pub use plan::run_plan;
pub use run::run_batch;

/// One fetcher per invocation, built from the `[fetch]` and `[retry]` config.
fn fetcher(cfg: &FavfetchConfig) -> Arc<IconFetcher> {
    Arc::new(IconFetcher::new(cfg.fetch_options()))
}
