use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// HTTP fetch parameters (`[fetch]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Browser-like User-Agent sent with every request.
    pub user_agent: String,
    /// Value of the `Accept-Language` request header.
    pub accept_language: String,
    /// Value of the `Accept` request header.
    pub accept: String,
    /// Language/country tag embedded in output filenames when `--language` is absent.
    pub default_language: String,
    /// Pause between consecutive fetches, in seconds (none before the first).
    pub delay_secs: f64,
    /// Redirects libcurl follows on its own in normal (non redirect-only) mode.
    pub max_redirects: u32,
    /// Optional connect timeout in seconds (None = libcurl default).
    pub connect_timeout_secs: Option<u64>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:18.0) Gecko/20100101 Firefox/18.0"
                .to_string(),
            accept_language: "en-us,en;q=0.8,he;q=0.5,es;q=0.3".to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                .to_string(),
            default_language: "en_US".to_string(),
            delay_secs: 2.0,
            max_redirects: 10,
            connect_timeout_secs: None,
        }
    }
}

/// Report generator parameters (`[report]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Name shown in the report title.
    pub data_set_name: String,
    /// Category directories that are not training data and are never walked.
    pub skipped_categories: Vec<String>,
    /// Categories that are tallied but never lower a language's maturity.
    pub non_maturity_categories: Vec<String>,
    /// Stylesheet referenced by the report (relative to the generated file).
    pub stylesheet: String,
    /// Scripts referenced by the report, in load order.
    pub scripts: Vec<String>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            data_set_name: "Internet Classification Data".to_string(),
            skipped_categories: vec!["possible".into(), "maybe".into(), "nml".into()],
            non_maturity_categories: vec![
                "adult.artnudes".into(),
                "childfriendly".into(),
                "government".into(),
            ],
            stylesheet: "style/sortableTable.css".to_string(),
            scripts: vec![
                "scripts/mootools-core-1.4.0-full-compat-yc.js".into(),
                "scripts/sortableTable.js".into(),
            ],
        }
    }
}

impl ReportSettings {
    pub fn is_skipped(&self, category: &str) -> bool {
        self.skipped_categories.iter().any(|c| c == category)
    }

    pub fn is_non_maturity(&self, category: &str) -> bool {
        self.non_maturity_categories.iter().any(|c| c == category)
    }
}

/// Global configuration loaded from `~/.config/trainkit/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainkitConfig {
    #[serde(default)]
    pub fetch: FetchSettings,
    #[serde(default)]
    pub report: ReportSettings,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("trainkit")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TrainkitConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = TrainkitConfig::default();
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

/// Load configuration from an explicit path. Missing keys take their defaults.
pub fn load_from(path: &Path) -> Result<TrainkitConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: TrainkitConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
