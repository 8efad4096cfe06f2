//! Data-file persistence: one JSON array or one CSV table per scrape run.
//!
//! Writes always replace the previous file. Reads are lenient so that files
//! from older runs (no numeric fee, no timestamp) remain usable.

use crate::error::DashboardError;
use crate::models::{ProgramRecord, StoredProgram};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;
use tracing::info;

const BOM: &str = "\u{feff}";

// ── Format ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    /// `.csv` files are CSV, everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => OutputFormat::Csv,
            _ => OutputFormat::Json,
        }
    }
}

// ── CSV row ───────────────────────────────────────────────────────────────────

/// CSV layout with Thai column headers.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "มหาวิทยาลัย")]
    university_name: String,
    #[serde(rename = "หลักสูตร")]
    course_name: String,
    #[serde(rename = "ค่าเทอม")]
    tuition_fee: String,
    #[serde(rename = "ค่าเทอม (บาท)")]
    tuition_fee_numeric: Option<f64>,
    #[serde(rename = "ลิงก์")]
    source_url: String,
    #[serde(rename = "คำค้นหา")]
    search_term: String,
    #[serde(rename = "เวลาที่ดึงข้อมูล", default)]
    scraped_at: Option<String>,
}

impl From<&ProgramRecord> for CsvRow {
    fn from(r: &ProgramRecord) -> Self {
        Self {
            university_name: r.university_name.clone(),
            course_name: r.course_name.clone(),
            tuition_fee: r.tuition_fee_raw.clone(),
            tuition_fee_numeric: r.tuition_fee_numeric,
            source_url: r.source_url.clone(),
            search_term: r.search_term.clone(),
            scraped_at: Some(r.scraped_at.format("%Y-%m-%dT%H:%M:%S").to_string()),
        }
    }
}

impl From<CsvRow> for StoredProgram {
    fn from(r: CsvRow) -> Self {
        Self {
            university_name: Some(r.university_name),
            course_name: Some(r.course_name),
            tuition_fee: Some(serde_json::Value::String(r.tuition_fee)),
            tuition_fee_numeric: r.tuition_fee_numeric,
            source_url: Some(r.source_url),
            search_term_used: Some(r.search_term),
            scraped_at: r.scraped_at,
        }
    }
}

// ── Writer ────────────────────────────────────────────────────────────────────

/// Write `records`, replacing whatever was at `path`.
pub fn write_records(path: &Path, format: OutputFormat, records: &[ProgramRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Could not create dir {:?}", parent))?;
    }

    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut out = BufWriter::new(file);

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, records).context("JSON encode failed")?;
            out.write_all(b"\n")?;
        }
        OutputFormat::Csv => {
            out.write_all(BOM.as_bytes())?;
            let mut wtr = csv::Writer::from_writer(&mut out);
            for r in records {
                wtr.serialize(CsvRow::from(r))
                    .with_context(|| format!("CSV encode {}", r.source_url))?;
            }
            wtr.flush()?;
        }
    }

    out.flush()?;
    info!("Saved {} records to {:?}", records.len(), path);
    Ok(())
}

// ── Reader ────────────────────────────────────────────────────────────────────

/// Load a data file for the dashboard, format chosen by extension.
pub fn load_programs(path: &Path) -> Result<Vec<StoredProgram>, DashboardError> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(DashboardError::NoData {
                path: path.to_path_buf(),
            });
        }
        Err(e) if e.kind() == ErrorKind::InvalidData => {
            return Err(DashboardError::Corrupt {
                reason: e.to_string(),
            });
        }
        Err(e) => {
            return Err(DashboardError::Unreadable {
                reason: e.to_string(),
            });
        }
    };
    let text = text.strip_prefix(BOM).unwrap_or(&text);

    match OutputFormat::from_path(path) {
        OutputFormat::Json => serde_json::from_str(text).map_err(|e| DashboardError::Corrupt {
            reason: e.to_string(),
        }),
        OutputFormat::Csv => {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(true)
                .from_reader(text.as_bytes());
            reader
                .deserialize::<CsvRow>()
                .map(|row| {
                    row.map(StoredProgram::from)
                        .map_err(|e| DashboardError::Corrupt {
                            reason: e.to_string(),
                        })
                })
                .collect()
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(fee_raw: &str, fee: Option<f64>) -> ProgramRecord {
        ProgramRecord {
            university_name: "มหาวิทยาลัยเกษตรศาสตร์".into(),
            course_name: "วิศวกรรมซอฟต์แวร์และความรู้".into(),
            tuition_fee_raw: fee_raw.into(),
            tuition_fee_numeric: fee,
            source_url: "https://course.mytcas.com/programs/10020104611201A".into(),
            search_term: "วิศวกรรมซอฟต์แวร์".into(),
            scraped_at: NaiveDate::from_ymd_opt(2026, 10, 14)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_json_keeps_thai_and_historic_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_records(&path, OutputFormat::Json, &[record("45,000 บาท", Some(45000.0))]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"tuition_fee\": \"45,000 บาท\""));
        assert!(text.contains("\"search_term_used\""));
        assert!(text.contains("มหาวิทยาลัยเกษตรศาสตร์"));

        let rows = load_programs(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tuition_fee_numeric, Some(45000.0));
    }

    #[test]
    fn test_csv_has_bom_and_thai_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_records(
            &path,
            OutputFormat::Csv,
            &[record("N/A", None), record("30,000", Some(30000.0))],
        )
        .unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(&[0xEF, 0xBB, 0xBF]));
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("มหาวิทยาลัย,หลักสูตร,ค่าเทอม"));

        let rows = load_programs(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].tuition_fee_numeric, None);
        assert_eq!(rows[1].tuition_fee_numeric, Some(30000.0));
    }

    #[test]
    fn test_write_overwrites_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_records(&path, OutputFormat::Json, &[record("1", Some(1.0)), record("2", Some(2.0))])
            .unwrap();
        write_records(&path, OutputFormat::Json, &[record("3", Some(3.0))]).unwrap();
        assert_eq!(load_programs(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(load_programs(&missing), Err(DashboardError::NoData { .. })));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "[{\"university_name\": ").unwrap();
        assert!(matches!(load_programs(&broken), Err(DashboardError::Corrupt { .. })));
    }

    #[test]
    fn test_old_files_without_numeric_field_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.json");
        fs::write(
            &path,
            r#"[{"university_name": "ม.ก", "course_name": "AI", "tuition_fee": "20,000", "source_url": "u", "search_term_used": "AI"}]"#,
        )
        .unwrap();
        let rows = load_programs(&path).unwrap();
        assert_eq!(rows[0].tuition_fee_numeric, None);
        assert_eq!(rows[0].tuition_fee, Some(serde_json::json!("20,000")));
    }
}
