use std::fmt::Write;

use crate::dashboard::report::{GroupMean, Report};
use crate::error::DashboardError;
use crate::utils::{fmt_baht, fmt_number};

const STYLE: &str = "body{font-family:sans-serif;margin:2rem auto;max-width:1100px;color:#222}\
table{border-collapse:collapse;width:100%}th,td{border:1px solid #ddd;padding:6px 8px;text-align:left}\
th{background:#f3f3f3}.cards{display:flex;gap:1rem}.card{flex:1;border:1px solid #ddd;border-radius:6px;padding:1rem}\
.card b{display:block;font-size:1.4rem}.error{background:#fff4e5;border:1px solid #f0b35b;padding:1rem;border-radius:6px}";

/// Minimal HTML escaping for text and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"th\"><head><meta charset=\"utf-8\">\
         <title>แดชบอร์ดค่าเทอม TCAS</title><style>{STYLE}</style></head>\
         <body><h1>แดชบอร์ดค่าเทอมหลักสูตรที่เกี่ยวข้อง</h1>{body}</body></html>"
    )
}

/// Page shown when there is nothing to chart.
pub fn render_error(err: &DashboardError) -> String {
    page(&format!("<div class=\"error\">{}</div>", escape(&err.to_string())))
}

fn group_table(body: &mut String, title: &str, label: &str, groups: &[GroupMean]) {
    let _ = write!(
        body,
        "<h2>{title}</h2><table><tr><th>{label}</th>\
         <th>จำนวนหลักสูตร</th><th>ค่าเทอมเฉลี่ย (บาท)</th></tr>"
    );
    for g in groups {
        let _ = write!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&g.label),
            g.programs,
            fmt_baht(g.mean_tuition)
        );
    }
    body.push_str("</table>");
}

pub fn render_report(r: &Report) -> String {
    let s = &r.summary;
    let mut body = String::new();

    let _ = write!(
        body,
        "<div class=\"cards\">\
         <div class=\"card\">จำนวนหลักสูตร<b>{}</b></div>\
         <div class=\"card\">ค่าเทอมต่ำสุด<b>{} บาท</b></div>\
         <div class=\"card\">ค่าเทอมสูงสุด<b>{} บาท</b></div>\
         <div class=\"card\">ค่าเทอมเฉลี่ย<b>{} บาท</b></div></div>",
        fmt_number(s.total_programs as i64),
        fmt_baht(s.min_tuition),
        fmt_baht(s.max_tuition),
        fmt_baht(s.avg_tuition),
    );
    if s.unpriced > 0 {
        let _ = write!(
            body,
            "<p>ไม่รวม {} หลักสูตรที่ไม่พบข้อมูลค่าเทอม</p>",
            fmt_number(s.unpriced as i64)
        );
    }

    let _ = write!(body, "<h2>กราฟ</h2>{}{}", r.chart_top_fees, r.chart_by_category);

    group_table(&mut body, "ค่าเทอมเฉลี่ยรายมหาวิทยาลัย", "มหาวิทยาลัย", &r.universities);
    group_table(&mut body, "ค่าเทอมเฉลี่ยตามประเภทหลักสูตร", "ประเภทหลักสูตร", &r.categories);

    body.push_str(
        "<h2>หลักสูตร (เรียงจากค่าเทอมต่ำสุด)</h2><table><tr><th>มหาวิทยาลัย</th>\
         <th>หลักสูตร</th><th>ค่าเทอม (บาท)</th></tr>",
    );
    for p in &r.table {
        let _ = write!(
            body,
            "<tr><td>{}</td><td><a href=\"{}\">{}</a></td><td>{}</td></tr>",
            escape(&p.university_name),
            escape(&p.source_url),
            escape(&p.course_name),
            fmt_baht(p.tuition)
        );
    }
    body.push_str("</table>");

    body.push_str("<h2>ข้อแนะนำสำหรับผู้สมัคร</h2><ul>");
    for tip in r.insights {
        let _ = write!(body, "<li>{}</li>", escape(tip));
    }
    body.push_str("</ul>");

    page(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
        assert_eq!(escape("มหาวิทยาลัย"), "มหาวิทยาลัย");
    }

    #[test]
    fn test_error_page_explains() {
        let html = render_error(&DashboardError::NoData {
            path: PathBuf::from("mytcas_tuition_data.json"),
        });
        assert!(html.contains("Data file not found"));
        assert!(html.contains("class=\"error\""));
    }

    #[test]
    fn test_report_lists_category_means() {
        use crate::config::DashboardConfig;
        use crate::dashboard::report::summarize;
        use crate::models::StoredProgram;

        let row = |course: &str, fee: f64| StoredProgram {
            university_name: Some("มหาวิทยาลัยมหิดล".into()),
            course_name: Some(course.into()),
            tuition_fee_numeric: Some(fee),
            ..Default::default()
        };
        let rows = vec![
            row("วิศวกรรมปัญญาประดิษฐ์", 40_000.0),
            row("วิทยาการคอมพิวเตอร์", 20_000.0),
            row("วิทยาการคอมพิวเตอร์ (ภาคพิเศษ)", 30_000.0),
        ];
        let report = summarize(&rows, &DashboardConfig::default()).unwrap();
        let html = render_report(&report);

        assert!(html.contains("ค่าเทอมเฉลี่ยตามประเภทหลักสูตร"));
        assert!(html.contains("<tr><td>วิทยาการคอมพิวเตอร์</td><td>2</td><td>25,000</td></tr>"));
        assert!(html.contains("<tr><td>วิศวกรรมปัญญาประดิษฐ์/AI</td><td>1</td><td>40,000</td></tr>"));
    }
}
