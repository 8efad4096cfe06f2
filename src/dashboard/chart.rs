//! Horizontal bar charts as inline SVG.

use std::fmt::Write;

use crate::dashboard::render::escape;
use crate::utils::fmt_baht;

const WIDTH: u32 = 960;
const LABEL_W: u32 = 380;
const BAR_H: u32 = 26;
const GAP: u32 = 8;
const TOP: u32 = 48;
const BOTTOM: u32 = 44;
const RIGHT_PAD: u32 = 90;

#[derive(Debug, Clone, Copy)]
pub enum Palette {
    Viridis,
    CoolWarm,
}

impl Palette {
    fn colors(self) -> &'static [&'static str] {
        match self {
            Palette::Viridis => &[
                "#440154", "#482878", "#3e4989", "#31688e", "#26828e", "#1f9e89", "#35b779",
                "#6ece58", "#b5de2b", "#fde725",
            ],
            Palette::CoolWarm => &[
                "#3b4cc0", "#6788ee", "#9abbff", "#c9d7f0", "#edd1c2", "#f7a889", "#e26952",
                "#b40426",
            ],
        }
    }

    /// Spread the palette evenly over `n` bars.
    fn color(self, i: usize, n: usize) -> &'static str {
        let colors = self.colors();
        if n <= 1 {
            return colors[0];
        }
        colors[i * (colors.len() - 1) / (n - 1)]
    }
}

/// Render `bars` (label, value) top to bottom. An empty input renders a
/// placeholder message instead of axes.
pub fn bar_chart(title: &str, x_label: &str, bars: &[(String, f64)], palette: Palette) -> String {
    let rows = bars.len().max(1) as u32;
    let plot_h = rows * (BAR_H + GAP);
    let height = TOP + plot_h + BOTTOM;
    let plot_w = WIDTH - LABEL_W - RIGHT_PAD;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {height}" width="100%" role="img" font-family="sans-serif">"#
    );
    let _ = write!(
        svg,
        r#"<text x="{}" y="28" font-size="18" text-anchor="middle">{}</text>"#,
        WIDTH / 2,
        escape(title)
    );

    if bars.is_empty() {
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" font-size="14" text-anchor="middle">ไม่พบข้อมูลค่าเทอมที่ถูกต้องสำหรับการสร้างกราฟ</text></svg>"#,
            WIDTH / 2,
            TOP + plot_h / 2
        );
        return svg;
    }

    let max = bars.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    let scale = if max > 0.0 { plot_w as f64 / max } else { 0.0 };

    for (i, (label, value)) in bars.iter().enumerate() {
        let y = TOP + i as u32 * (BAR_H + GAP);
        let w = (value * scale).max(1.0);
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" font-size="12" text-anchor="end">{}</text>"#,
            LABEL_W - 8,
            y + BAR_H / 2 + 4,
            escape(&truncate(label, 48))
        );
        let _ = write!(
            svg,
            r#"<rect x="{LABEL_W}" y="{y}" width="{w:.1}" height="{BAR_H}" fill="{}"><title>{}: {}</title></rect>"#,
            palette.color(i, bars.len()),
            escape(label),
            fmt_baht(*value)
        );
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{}" font-size="11">{}</text>"#,
            LABEL_W as f64 + w + 6.0,
            y + BAR_H / 2 + 4,
            fmt_baht(*value)
        );
    }

    let _ = write!(
        svg,
        r##"<line x1="{LABEL_W}" y1="{}" x2="{}" y2="{}" stroke="#999"/><text x="{}" y="{}" font-size="13" text-anchor="middle">{}</text></svg>"##,
        TOP + plot_h,
        LABEL_W + plot_w,
        TOP + plot_h,
        LABEL_W + plot_w / 2,
        height - 12,
        escape(x_label)
    );
    svg
}

/// Shorten by characters, not bytes (Thai labels are multi-byte).
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}
