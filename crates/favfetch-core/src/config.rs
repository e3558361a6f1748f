use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetch::FetchOptions;
use crate::naming::IconNaming;
use crate::retry::RetryPolicy;

/// Retry policy parameters (optional `[retry]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per icon (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.25,
            max_delay_secs: 10,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(cfg: &RetryConfig) -> Self {
        RetryPolicy {
            max_attempts: cfg.max_attempts.max(1),
            base_delay: Duration::try_from_secs_f64(cfg.base_delay_secs.max(0.0))
                .unwrap_or_else(|_| {
                    tracing::warn!(
                        "retry.base_delay_secs = {} is out of range; using default",
                        cfg.base_delay_secs
                    );
                    RetryPolicy::single_attempt().base_delay
                }),
            max_delay: Duration::from_secs(cfg.max_delay_secs),
        }
    }
}

/// HTTP request settings shared by every icon download (`[fetch]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Connect timeout in seconds (0 = no timeout).
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout in seconds (0 = no timeout).
    pub timeout_secs: u64,
    /// Follow 3xx redirects before judging the status code.
    pub follow_redirects: bool,
    /// Headers sent with every request (e.g. User-Agent, Referer, Accept).
    pub headers: HashMap<String, String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 60,
            follow_redirects: true,
            headers: HashMap::new(),
        }
    }
}

/// Per-title exception applied during a batch run (`[[overrides]]`).
///
/// Lets one named item use a different URL, file stem, or extra headers
/// without changing how every other item is handled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IconOverride {
    /// Exact item title this override applies to.
    pub title: String,
    /// Replacement icon URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Replacement file stem (without extension).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Extra headers for this item only; they win over `[fetch.headers]`.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

/// Global configuration loaded from `~/.config/favfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FavfetchConfig {
    /// Bookmarks JSON file, read and rewritten in place.
    pub bookmarks_path: PathBuf,
    /// Directory that receives the downloaded icon files.
    pub icon_dir: PathBuf,
    /// Prefix of the relative path written into each patched item.
    pub public_prefix: String,
    /// File extension for saved icons.
    pub icon_extension: String,
    /// Maximum downloads in flight (None = launch all at once).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<usize>,
    pub fetch: FetchConfig,
    /// Optional retry policy; if missing, each icon is tried exactly once.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<IconOverride>,
}

impl Default for FavfetchConfig {
    fn default() -> Self {
        Self {
            bookmarks_path: PathBuf::from("src/assets/config/bookmarks.json"),
            icon_dir: PathBuf::from("src/assets/icons"),
            public_prefix: "./assets/icons".to_string(),
            icon_extension: "ico".to_string(),
            max_concurrent: None,
            fetch: FetchConfig::default(),
            retry: None,
            overrides: Vec::new(),
        }
    }
}

impl FavfetchConfig {
    /// Naming rules for saved icons.
    pub fn naming(&self) -> IconNaming {
        IconNaming::new(&self.icon_extension, &self.public_prefix)
    }

    /// Request options for the shared icon fetcher.
    pub fn fetch_options(&self) -> FetchOptions {
        let secs = |s: u64| (s > 0).then(|| Duration::from_secs(s));
        FetchOptions {
            headers: self.fetch.headers.clone(),
            connect_timeout: secs(self.fetch.connect_timeout_secs),
            timeout: secs(self.fetch.timeout_secs),
            follow_redirects: self.fetch.follow_redirects,
            retry: self
                .retry
                .as_ref()
                .map(RetryPolicy::from)
                .unwrap_or_else(RetryPolicy::single_attempt),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("favfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<FavfetchConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: FavfetchConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FavfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FavfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = FavfetchConfig::default();
        assert_eq!(cfg.public_prefix, "./assets/icons");
        assert_eq!(cfg.icon_extension, "ico");
        assert!(cfg.max_concurrent.is_none());
        assert!(cfg.retry.is_none());
        assert_eq!(cfg.fetch.connect_timeout_secs, 30);
        assert!(cfg.fetch.follow_redirects);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = FavfetchConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: FavfetchConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.bookmarks_path, cfg.bookmarks_path);
        assert_eq!(parsed.icon_dir, cfg.icon_dir);
        assert_eq!(parsed.public_prefix, cfg.public_prefix);
        assert_eq!(parsed.fetch.timeout_secs, cfg.fetch.timeout_secs);
    }

    #[test]
    fn config_toml_partial_file_uses_defaults() {
        let toml = r#"
            icon_dir = "public/icons"
            max_concurrent = 4
        "#;
        let cfg: FavfetchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.icon_dir, PathBuf::from("public/icons"));
        assert_eq!(cfg.max_concurrent, Some(4));
        assert_eq!(cfg.icon_extension, "ico");
        assert_eq!(cfg.fetch.timeout_secs, 60);
    }

    #[test]
    fn config_toml_headers_retry_and_overrides() {
        let toml = r#"
            [fetch]
            timeout_secs = 0

            [fetch.headers]
            User-Agent = "Mozilla/5.0"
            Referer = "https://www.google.com/"

            [retry]
            max_attempts = 4
            base_delay_secs = 0.5
            max_delay_secs = 5

            [[overrides]]
            title = "OpenSea"
            url = "https://opensea.io/favicon.ico"
            name = "opensea"

            [overrides.headers]
            Cookie = "a=b"
        "#;
        let cfg: FavfetchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.fetch.headers.get("User-Agent").unwrap(), "Mozilla/5.0");
        let retry = cfg.retry.as_ref().unwrap();
        assert_eq!(retry.max_attempts, 4);
        assert_eq!(cfg.overrides.len(), 1);
        assert_eq!(cfg.overrides[0].title, "OpenSea");
        assert_eq!(cfg.overrides[0].name.as_deref(), Some("opensea"));
        assert_eq!(cfg.overrides[0].headers.get("Cookie").unwrap(), "a=b");

        let opts = cfg.fetch_options();
        assert!(opts.timeout.is_none());
        assert_eq!(opts.connect_timeout, Some(Duration::from_secs(30)));
        assert_eq!(opts.retry.max_attempts, 4);
        assert_eq!(opts.retry.base_delay, Duration::from_millis(500));
    }

    #[test]
    fn out_of_range_base_delay_falls_back_to_default() {
        for secs in [f64::INFINITY, 1e300] {
            let cfg = RetryConfig {
                max_attempts: 2,
                base_delay_secs: secs,
                max_delay_secs: 5,
            };
            let policy = RetryPolicy::from(&cfg);
            assert_eq!(policy.base_delay, RetryPolicy::single_attempt().base_delay);
        }
        let toml = "[retry]\nmax_attempts = 2\nbase_delay_secs = inf\nmax_delay_secs = 5\n";
        let cfg: FavfetchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.fetch_options().retry.max_attempts, 2);
    }

    #[test]
    fn missing_retry_section_means_single_attempt() {
        let opts = FavfetchConfig::default().fetch_options();
        assert_eq!(opts.retry.max_attempts, 1);
    }
}
