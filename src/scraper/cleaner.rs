use chrono::NaiveDateTime;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

use crate::models::{ProgramRecord, RawDetailFields, SearchResult};
use crate::scraper::selectors::{DOMAIN_KEYWORDS, NOT_FOUND};

// ── Fee normalizer ────────────────────────────────────────────────────────────

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").expect("static fee regex"));

/// Pull the first number out of a free-text fee.
/// "อัตราค่าเล่าเรียน 28,000.-/ภาคการศึกษา" → 28000.0 | "ไม่ระบุ" → None
///
/// Absence is `None`, never `0.0`: a program with no listed fee must not
/// drag averages down.
pub fn normalize_fee(s: &str) -> Option<f64> {
    let cleaned = s.replace(',', "");
    let m = NUMBER.find(&cleaned)?;
    m.as_str().parse().ok().filter(|v: &f64| v.is_finite())
}

/// Fee from a stored JSON value. Strings are normalized, numbers taken as is,
/// anything else is absent.
pub fn normalize_fee_value(v: &Value) -> Option<f64> {
    match v {
        Value::String(s) => normalize_fee(s),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

// ── Detail fields → ProgramRecord ─────────────────────────────────────────────

/// True if either name mentions one of the domain keywords.
pub fn is_relevant(university_name: &str, course_name: &str) -> bool {
    DOMAIN_KEYWORDS
        .iter()
        .any(|k| course_name.contains(k) || university_name.contains(k))
}

/// Why a detail page produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    MissingNames,
    Irrelevant,
}

/// Build the record for one detail page. Both names must have been found and
/// at least one must be on-topic; the fee may be missing.
pub fn detail_to_record(
    link: &SearchResult,
    fields: RawDetailFields,
    now: NaiveDateTime,
) -> Result<ProgramRecord, Rejection> {
    let (Some(university_name), Some(course_name)) = (fields.university_name, fields.course_name)
    else {
        return Err(Rejection::MissingNames);
    };

    if !is_relevant(&university_name, &course_name) {
        debug!("Off-topic: {} | {}", university_name, course_name);
        return Err(Rejection::Irrelevant);
    }

    let tuition_fee_raw = fields.tuition_fee.unwrap_or_else(|| NOT_FOUND.to_string());
    let tuition_fee_numeric = normalize_fee(&tuition_fee_raw);

    Ok(ProgramRecord {
        university_name,
        course_name,
        tuition_fee_raw,
        tuition_fee_numeric,
        source_url: link.url.clone(),
        search_term: link.keyword.clone(),
        scraped_at: now,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
