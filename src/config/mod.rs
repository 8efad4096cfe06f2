use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::storage::OutputFormat;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Browser-driven scraper configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScraperConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// chromedriver (or any W3C WebDriver) endpoint
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(default = "default_search_timeout_secs")]
    pub search_timeout_secs: u64,

    #[serde(default = "default_results_timeout_secs")]
    pub results_timeout_secs: u64,

    #[serde(default = "default_page_load_timeout_secs")]
    pub page_load_timeout_secs: u64,

    /// Per-locator wait on detail pages
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Fixed wait after submitting a search, before polling for results
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Pause between successive detail-page visits
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    #[serde(default = "default_data_path")]
    pub output_path: PathBuf,

    #[serde(default)]
    pub output_format: OutputFormat,
}

/// Dashboard server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    #[serde(default = "default_bind")]
    pub bind: String,

    /// Bars in the highest-fee chart
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    #[serde(default = "default_table_rows")]
    pub table_rows: usize,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_base_url() -> String {
    "https://course.mytcas.com/".to_string()
}
fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}
fn default_true() -> bool {
    true
}
fn default_search_timeout_secs() -> u64 {
    15
}
fn default_results_timeout_secs() -> u64 {
    20
}
fn default_page_load_timeout_secs() -> u64 {
    30
}
fn default_probe_timeout_ms() -> u64 {
    3000
}
fn default_settle_ms() -> u64 {
    1000
}
fn default_request_delay_ms() -> u64 {
    1000
}
fn default_data_path() -> PathBuf {
    PathBuf::from("mytcas_tuition_data.json")
}
fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}
fn default_top_n() -> usize {
    15
}
fn default_table_rows() -> usize {
    20
}

impl ScraperConfig {
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    pub fn results_timeout(&self) -> Duration {
        Duration::from_secs(self.results_timeout_secs)
    }

    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load `config/default.toml` then `config/local.toml`; both optional.
    pub fn load() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .build()?;

        Self::from_config(cfg)
    }

    /// Any invalid value fails the whole load.
    pub fn from_config(cfg: config::Config) -> Result<Self> {
        cfg.try_deserialize().context("Invalid configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scraper: ScraperConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            webdriver_url: default_webdriver_url(),
            headless: true,
            search_timeout_secs: default_search_timeout_secs(),
            results_timeout_secs: default_results_timeout_secs(),
            page_load_timeout_secs: default_page_load_timeout_secs(),
            probe_timeout_ms: default_probe_timeout_ms(),
            settle_ms: default_settle_ms(),
            request_delay_ms: default_request_delay_ms(),
            output_path: default_data_path(),
            output_format: OutputFormat::default(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            bind: default_bind(),
            top_n: default_top_n(),
            table_rows: default_table_rows(),
        }
    }
}
