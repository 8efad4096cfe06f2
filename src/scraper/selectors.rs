//! Locators for course.mytcas.com.
//!
//! Each logical field has an ordered candidate list; the first candidate that
//! is present and visible wins. Update these when the site layout changes.

/// One way of finding an element on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    Css(&'static str),
    XPath(&'static str),
}

impl Locator {
    pub fn expr(&self) -> &'static str {
        match self {
            Locator::Css(s) | Locator::XPath(s) => s,
        }
    }
}

/// Search box on the landing page.
pub static SEARCH_INPUT: &[Locator] = &[
    Locator::Css("#search"),
    Locator::Css("input#input-search"),
    Locator::Css("input[type='search']"),
];

/// Appears once search results are rendered.
pub static RESULT_LIST: Locator = Locator::Css("ul.t-programs > li");

/// Result items and the program link inside each, parsed from page source.
pub const RESULT_ITEM_CSS: &str = "ul.t-programs > li";
pub const RESULT_LINK_CSS: &str = "a[href*='/programs/']";
pub const PROGRAM_PATH_MARKER: &str = "/programs/";

// ── Detail page ───────────────────────────────────────────────────────────────

pub static UNIVERSITY_NAME: &[Locator] = &[
    Locator::Css("div.container.py-3 h2"),
    Locator::Css("main h2"),
];

pub static COURSE_NAME: &[Locator] = &[
    Locator::Css("div.container.py-3 h3"),
    Locator::Css("main h3"),
];

/// The fee sits in the cell right after a "ค่าใช้จ่าย" (or "ค่าเล่าเรียน") label cell.
pub static TUITION_FEE: &[Locator] = &[
    Locator::XPath(
        "//div[contains(@class,'col-6') and normalize-space(.)='ค่าใช้จ่าย']\
         /following-sibling::div[contains(@class,'col-6')][1]",
    ),
    Locator::XPath(
        "//div[contains(@class,'col-6') and contains(normalize-space(.),'ค่าใช้จ่าย')]\
         /following-sibling::div[1]",
    ),
    Locator::XPath("//dt[contains(.,'ค่าเล่าเรียน')]/following-sibling::dd[1]"),
];

// ── Relevance filter ──────────────────────────────────────────────────────────

/// A record is kept only if its university or program name contains one of these.
pub static DOMAIN_KEYWORDS: &[&str] = &[
    "ปัญญาประดิษฐ์",
    "คอมพิวเตอร์",
    "AI",
    "Software",
    "วิทยาการ",
    "วิศวกรรม",
    "เทคโนโลยีสารสนเทศ",
];

/// Persisted in place of a fee no locator could find.
pub const NOT_FOUND: &str = "N/A";
