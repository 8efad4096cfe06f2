use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ── Program record ────────────────────────────────────────────────────────────

/// One scraped program. Written once per run, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgramRecord {
    pub university_name: String,
    pub course_name: String,
    #[serde(rename = "tuition_fee")]
    pub tuition_fee_raw: String,
    /// `None` when the raw string carried no numeric token
    pub tuition_fee_numeric: Option<f64>,
    pub source_url: String,
    #[serde(rename = "search_term_used")]
    pub search_term: String,
    pub scraped_at: NaiveDateTime,
}

// ── Search result ─────────────────────────────────────────────────────────────

/// A program link found on the search results list. Lives for one run only.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchResult {
    pub keyword: String,
    pub url: String,
    pub name: Option<String>,
    pub faculty: Option<String>,
    pub university: Option<String>,
}

// ── Raw detail fields ─────────────────────────────────────────────────────────

/// Detail-page fields as found by the extractor; `None` means no locator matched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDetailFields {
    pub university_name: Option<String>,
    pub course_name: Option<String>,
    pub tuition_fee: Option<String>,
}

// ── Stored rows (lenient load side) ───────────────────────────────────────────

/// A row read back from a data file. Files from older runs may lack the
/// numeric fee or timestamp, and the fee itself may be a string, a number or null.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoredProgram {
    pub university_name: Option<String>,
    pub course_name: Option<String>,
    pub tuition_fee: Option<serde_json::Value>,
    pub tuition_fee_numeric: Option<f64>,
    pub source_url: Option<String>,
    pub search_term_used: Option<String>,
    pub scraped_at: Option<String>,
}

/// A row the dashboard can chart: fee known.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedProgram {
    pub university_name: String,
    pub course_name: String,
    pub tuition: f64,
    pub source_url: String,
}
