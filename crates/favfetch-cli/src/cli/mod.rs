//! CLI for favfetch.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use favfetch_core::config::{self, FavfetchConfig};
use std::path::{Path, PathBuf};

use commands::{parse_header, run_batch, run_completions, run_fetch_one, run_plan};

/// Top-level CLI for favfetch.
#[derive(Debug, Parser)]
#[command(name = "favfetch")]
#[command(about = "Fetch bookmark favicons and point the bookmarks file at local copies", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/favfetch/config.toml, created if missing).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Paths shared by the commands that touch the bookmarks file.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct PathArgs {
    /// Bookmarks JSON file to read and rewrite.
    #[arg(long, value_name = "PATH")]
    pub bookmarks: Option<PathBuf>,
    /// Directory that receives icon files (created if absent).
    #[arg(long, value_name = "DIR")]
    pub icon_dir: Option<PathBuf>,
    /// Prefix of the path written into each patched item (e.g. ./assets/icons).
    #[arg(long, value_name = "PREFIX")]
    pub public_prefix: Option<String>,
}

impl PathArgs {
    /// Overlay flags onto the loaded config.
    pub fn apply(&self, cfg: &mut FavfetchConfig) {
        if let Some(p) = &self.bookmarks {
            cfg.bookmarks_path = p.clone();
        }
        if let Some(d) = &self.icon_dir {
            cfg.icon_dir = d.clone();
        }
        if let Some(prefix) = &self.public_prefix {
            cfg.public_prefix = prefix.clone();
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every remote favicon and patch the bookmarks file.
    Run {
        #[command(flatten)]
        paths: PathArgs,
        /// Run at most N downloads at once (default: all at once).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
        /// Show what would be downloaded without making requests or writing files.
        #[arg(long)]
        dry_run: bool,
    },

    /// Download one icon and patch every item with the given title.
    FetchOne {
        /// Exact title of the item(s) to patch.
        #[arg(long)]
        title: String,
        /// Icon URL.
        #[arg(long)]
        url: String,
        /// File stem to save as (default: derived from the title).
        #[arg(long)]
        name: Option<String>,
        /// Extra request header, "Name: value". Repeatable.
        #[arg(long = "header", value_name = "NAME: VALUE", value_parser = parse_header)]
        headers: Vec<(String, String)>,
        #[command(flatten)]
        paths: PathArgs,
    },

    /// List the downloads a run would perform.
    Plan {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// Print shell completions.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },
}

/// Config file (explicit or XDG default) with command-line paths layered on top.
fn load_config(explicit: Option<&Path>, paths: &PathArgs) -> Result<FavfetchConfig> {
    let mut cfg = match explicit {
        Some(path) => config::load_from(path)?,
        None => config::load_or_init()?,
    };
    paths.apply(&mut cfg);
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let explicit = cli.config.as_deref();

        match cli.command {
            CliCommand::Run {
                paths,
                jobs,
                dry_run,
            } => {
                let mut cfg = load_config(explicit, &paths)?;
                if jobs.is_some() {
                    cfg.max_concurrent = jobs;
                }
                run_batch(&cfg, dry_run).await?;
            }
            CliCommand::FetchOne {
                title,
                url,
                name,
                headers,
                paths,
            } => {
                let cfg = load_config(explicit, &paths)?;
                run_fetch_one(&cfg, title, url, name, headers).await?;
            }
            CliCommand::Plan { paths } => {
                let cfg = load_config(explicit, &paths)?;
                run_plan(&cfg)?;
            }
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
