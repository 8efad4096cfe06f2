use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::config::DashboardConfig;
use crate::dashboard::chart::{self, Palette};
use crate::error::DashboardError;
use crate::models::{PricedProgram, StoredProgram};
use crate::scraper::cleaner::normalize_fee_value;
use crate::storage::load_programs;

pub const INSIGHTS: &[&str] = &[
    "เปรียบเทียบค่าเทอมของหลักสูตรที่สนใจ เพื่อวางแผนค่าใช้จ่ายได้ง่ายขึ้น",
    "ค้นหามหาวิทยาลัยที่เสนอค่าเทอมที่เข้าถึงได้สำหรับสาขาที่คุณต้องการ",
    "ดูแนวโน้มค่าเทอมเฉลี่ยของแต่ละสาขา เพื่อเป็นข้อมูลในการตัดสินใจ",
    "พิจารณาทั้งค่าเทอมและชื่อเสียงของมหาวิทยาลัยควบคู่กันไป",
];

// ── Context types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub total_programs: usize,
    pub min_tuition: f64,
    pub max_tuition: f64,
    pub avg_tuition: f64,
    /// Rows whose fee could not be read. Excluded from every figure above.
    pub unpriced: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    pub label: String,
    pub programs: usize,
    pub mean_tuition: f64,
}

/// Everything the page template needs.
#[derive(Debug, Clone)]
pub struct Report {
    pub summary: SummaryStats,
    pub universities: Vec<GroupMean>,
    pub categories: Vec<GroupMean>,
    /// Cheapest programs first
    pub table: Vec<PricedProgram>,
    pub chart_top_fees: String,
    pub chart_by_category: String,
    pub insights: &'static [&'static str],
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Load `path` and build the dashboard context. Recomputed on every request.
pub fn build_report(path: &Path, config: &DashboardConfig) -> Result<Report, DashboardError> {
    let rows = load_programs(path)?;
    summarize(&rows, config)
}

pub fn summarize(rows: &[StoredProgram], config: &DashboardConfig) -> Result<Report, DashboardError> {
    let (mut priced, unpriced) = price_rows(rows);
    if priced.is_empty() {
        return Err(DashboardError::Empty);
    }
    priced.sort_by(|a, b| a.tuition.total_cmp(&b.tuition));

    let summary = summary_stats(&priced, unpriced);
    let universities = group_means(&priced, |p| p.university_name.clone());
    let categories = group_means(&priced, |p| categorize_program(&p.course_name).to_string());

    let top = top_fees(&priced, config.top_n);
    let top_bars: Vec<(String, f64)> = top
        .iter()
        .map(|p| (format!("{} - {}", p.university_name, p.course_name), p.tuition))
        .collect();
    let category_bars: Vec<(String, f64)> = categories
        .iter()
        .map(|g| (g.label.clone(), g.mean_tuition))
        .collect();

    Ok(Report {
        chart_top_fees: chart::bar_chart(
            &format!("ค่าเทอมสูงสุด {} หลักสูตรที่เกี่ยวข้อง (บาท/ภาคการศึกษา)", top.len()),
            "ค่าเทอม (บาท/ภาคการศึกษา)",
            &top_bars,
            Palette::Viridis,
        ),
        chart_by_category: chart::bar_chart(
            "ค่าเทอมเฉลี่ยตามประเภทหลักสูตร",
            "ค่าเทอมเฉลี่ย (บาท/ภาคการศึกษา)",
            &category_bars,
            Palette::CoolWarm,
        ),
        table: priced.iter().take(config.table_rows).cloned().collect(),
        summary,
        universities,
        categories,
        insights: INSIGHTS,
    })
}

/// Split rows into priced programs and a count of rows without a usable fee.
/// A stored numeric fee wins; otherwise the raw fee is normalized.
fn price_rows(rows: &[StoredProgram]) -> (Vec<PricedProgram>, usize) {
    let mut priced = Vec::with_capacity(rows.len());
    let mut unpriced = 0;

    for row in rows {
        let tuition = row
            .tuition_fee_numeric
            .or_else(|| row.tuition_fee.as_ref().and_then(normalize_fee_value));
        let Some(tuition) = tuition.filter(|t| t.is_finite()) else {
            unpriced += 1;
            continue;
        };
        priced.push(PricedProgram {
            university_name: row.university_name.clone().unwrap_or_default(),
            course_name: row.course_name.clone().unwrap_or_default(),
            tuition,
            source_url: row.source_url.clone().unwrap_or_default(),
        });
    }

    if unpriced > 0 {
        debug!("{} rows without a readable fee", unpriced);
    }
    (priced, unpriced)
}

fn summary_stats(priced: &[PricedProgram], unpriced: usize) -> SummaryStats {
    let fees = priced.iter().map(|p| p.tuition);
    SummaryStats {
        total_programs: priced.len(),
        min_tuition: fees.clone().fold(f64::INFINITY, f64::min),
        max_tuition: fees.clone().fold(f64::NEG_INFINITY, f64::max),
        avg_tuition: fees.sum::<f64>() / priced.len() as f64,
        unpriced,
    }
}

/// Mean fee per group, highest mean first.
fn group_means<F>(priced: &[PricedProgram], key: F) -> Vec<GroupMean>
where
    F: Fn(&PricedProgram) -> String,
{
    let mut groups: BTreeMap<String, (usize, f64)> = BTreeMap::new();
    for p in priced {
        let entry = groups.entry(key(p)).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += p.tuition;
    }

    let mut out: Vec<GroupMean> = groups
        .into_iter()
        .map(|(label, (n, sum))| GroupMean {
            label,
            programs: n,
            mean_tuition: sum / n as f64,
        })
        .collect();
    out.sort_by(|a, b| b.mean_tuition.total_cmp(&a.mean_tuition));
    out
}

/// The `n` most expensive programs, most expensive first. Ties keep file order.
fn top_fees(priced: &[PricedProgram], n: usize) -> Vec<PricedProgram> {
    let mut sorted = priced.to_vec();
    sorted.sort_by(|a, b| b.tuition.total_cmp(&a.tuition));
    sorted.truncate(n);
    sorted
}

/// Broad program family used for the per-category chart.
pub fn categorize_program(name: &str) -> &'static str {
    if name.contains("ปัญญาประดิษฐ์") || name.contains("AI") {
        "วิศวกรรมปัญญาประดิษฐ์/AI"
    } else if name.contains("วิทยาการคอมพิวเตอร์") {
        "วิทยาการคอมพิวเตอร์"
    } else if name.contains("คอมพิวเตอร์") || name.contains("ซอฟต์แวร์") {
        "วิศวกรรมคอมพิวเตอร์/ซอฟต์แวร์"
    } else {
        "อื่นๆ"
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(uni: &str, course: &str, fee: serde_json::Value) -> StoredProgram {
        StoredProgram {
            university_name: Some(uni.into()),
            course_name: Some(course.into()),
            tuition_fee: Some(fee),
            ..Default::default()
        }
    }

    fn cfg() -> DashboardConfig {
        DashboardConfig::default()
    }

    #[test]
    fn test_three_fee_summary() {
        let rows = vec![
            row("ม.A", "วิศวกรรมคอมพิวเตอร์", json!("10,000 บาท")),
            row("ม.B", "วิศวกรรมปัญญาประดิษฐ์", json!("20,000 บาท")),
            row("ม.A", "วิทยาการคอมพิวเตอร์", json!("30,000 บาท")),
        ];
        let report = summarize(&rows, &cfg()).unwrap();
        let s = &report.summary;
        assert_eq!(s.total_programs, 3);
        assert_eq!(s.min_tuition, 10000.0);
        assert_eq!(s.max_tuition, 30000.0);
        assert_eq!(s.avg_tuition, 20000.0);
        assert_eq!(s.unpriced, 0);
    }

    #[test]
    fn test_unpriced_rows_do_not_count_as_zero() {
        let rows = vec![
            row("ม.A", "วิศวกรรมคอมพิวเตอร์", json!("10,000")),
            row("ม.A", "วิศวกรรมคอมพิวเตอร์", json!("N/A")),
            row("ม.B", "วิศวกรรมซอฟต์แวร์", json!(null)),
            row("ม.B", "วิศวกรรมซอฟต์แวร์", json!(30000)),
        ];
        let report = summarize(&rows, &cfg()).unwrap();
        assert_eq!(report.summary.total_programs, 2);
        assert_eq!(report.summary.unpriced, 2);
        assert_eq!(report.summary.avg_tuition, 20000.0);
        assert_eq!(report.summary.min_tuition, 10000.0);
    }

    #[test]
    fn test_per_university_means() {
        let rows = vec![
            row("ม.A", "วิศวกรรมคอมพิวเตอร์", json!("10,000")),
            row("ม.A", "วิศวกรรมปัญญาประดิษฐ์", json!("30,000")),
            row("ม.B", "วิศวกรรมซอฟต์แวร์", json!("50,000")),
        ];
        let report = summarize(&rows, &cfg()).unwrap();
        assert_eq!(
            report.universities,
            vec![
                GroupMean { label: "ม.B".into(), programs: 1, mean_tuition: 50000.0 },
                GroupMean { label: "ม.A".into(), programs: 2, mean_tuition: 20000.0 },
            ]
        );
    }

    #[test]
    fn test_table_cheapest_first_and_top_chart_bounded() {
        let rows: Vec<StoredProgram> = (1..=30)
            .map(|i| row("ม.A", "วิศวกรรมคอมพิวเตอร์", json!(format!("{},000", i))))
            .collect();
        let report = summarize(&rows, &cfg()).unwrap();
        assert_eq!(report.table.len(), 20);
        assert_eq!(report.table[0].tuition, 1000.0);
        assert!(report.chart_top_fees.contains("ค่าเทอมสูงสุด 15"));
        assert!(report.chart_top_fees.starts_with("<svg"));
    }

    #[test]
    fn test_no_priced_rows_is_empty() {
        let rows = vec![row("ม.A", "วิศวกรรมคอมพิวเตอร์", json!("ไม่ระบุ"))];
        assert!(matches!(summarize(&rows, &cfg()), Err(DashboardError::Empty)));
        assert!(matches!(summarize(&[], &cfg()), Err(DashboardError::Empty)));
    }

    #[test]
    fn test_categories() {
        assert_eq!(categorize_program("วิศวกรรมปัญญาประดิษฐ์"), "วิศวกรรมปัญญาประดิษฐ์/AI");
        assert_eq!(categorize_program("Applied AI"), "วิศวกรรมปัญญาประดิษฐ์/AI");
        assert_eq!(categorize_program("วิศวกรรมซอฟต์แวร์"), "วิศวกรรมคอมพิวเตอร์/ซอฟต์แวร์");
        assert_eq!(categorize_program("วิทยาการคอมพิวเตอร์"), "วิทยาการคอมพิวเตอร์");
        assert_eq!(categorize_program("เทคโนโลยีสารสนเทศ"), "อื่นๆ");
    }

    #[test]
    fn test_build_report_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(
            &path,
            r#"[
              {"university_name": "ม.A", "course_name": "AI", "tuition_fee": "10,000"},
              {"university_name": "ม.B", "course_name": "AI", "tuition_fee": "20,000"},
              {"university_name": "ม.C", "course_name": "AI", "tuition_fee": "30,000"}
            ]"#,
        )
        .unwrap();
        let report = build_report(&path, &cfg()).unwrap();
        assert_eq!(report.summary.avg_tuition, 20000.0);
    }
}
