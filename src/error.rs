use std::path::PathBuf;
use thiserror::Error;

/// Failures inside a scrape run. Everything except `Browser` raised while
/// launching is absorbed per keyword or per page by the pipeline.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("WebDriver error: {0}")]
    Browser(#[from] thirtyfour::error::WebDriverError),

    #[error("No visible search input on {url}")]
    SearchInputMissing { url: String },

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Invalid URL {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Reasons the dashboard has nothing to chart. Each one is rendered as a
/// message on the page, never as a server error.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Data file not found ({}). Please run `tcas-tuition scrape` first.", path.display())]
    NoData { path: PathBuf },

    #[error("Error decoding data file. File might be corrupted: {reason}")]
    Corrupt { reason: String },

    #[error("An unexpected error occurred while loading data: {reason}")]
    Unreadable { reason: String },

    #[error("No data available to display. Please run the scraper.")]
    Empty,
}
