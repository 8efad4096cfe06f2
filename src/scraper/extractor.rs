use std::time::Duration;
use tracing::debug;

use crate::models::RawDetailFields;
use crate::scraper::browser::Page;
use crate::scraper::selectors::{self, Locator};

/// Try each candidate in order; the first one visible within `timeout` wins.
/// A probe error is treated as "not this one" and the next candidate is tried.
pub async fn first_visible_text(
    page: &dyn Page,
    candidates: &[Locator],
    timeout: Duration,
) -> Option<String> {
    for locator in candidates {
        match page.visible_text(locator, timeout).await {
            Ok(Some(text)) => return Some(text),
            Ok(None) => {}
            Err(e) => debug!("Probe {:?} failed: {}", locator, e),
        }
    }
    None
}

/// Read university, program and fee off a loaded detail page.
pub async fn extract_details(page: &dyn Page, timeout: Duration) -> RawDetailFields {
    RawDetailFields {
        university_name: first_visible_text(page, selectors::UNIVERSITY_NAME, timeout).await,
        course_name: first_visible_text(page, selectors::COURSE_NAME, timeout).await,
        tuition_fee: first_visible_text(page, selectors::TUITION_FEE, timeout).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::browser::fake::{FakeDoc, FakePage, FakeSite};
    use std::sync::Arc;

    const URL: &str = "https://course.mytcas.com/programs/10020104611201A";

    fn page_with(doc: FakeDoc) -> FakePage {
        let mut site = FakeSite::default();
        site.pages.insert(URL.to_string(), doc);
        FakePage::on(Arc::new(site), URL)
    }

    #[test]
    fn test_fallback_to_second_locator() {
        let doc = FakeDoc::default()
            .with(&selectors::UNIVERSITY_NAME[1], "  จุฬาลงกรณ์มหาวิทยาลัย \n")
            .with(&selectors::COURSE_NAME[0], "วิศวกรรมศาสตรบัณฑิต สาขาวิชาวิศวกรรมคอมพิวเตอร์")
            .with(&selectors::TUITION_FEE[2], "อัตราค่าเล่าเรียน 28,000.-/ภาคการศึกษา");
        let page = page_with(doc);

        let fields = tokio_test::block_on(extract_details(&page, Duration::ZERO));
        assert_eq!(fields.university_name.as_deref(), Some("จุฬาลงกรณ์มหาวิทยาลัย"));
        assert_eq!(
            fields.course_name.as_deref(),
            Some("วิศวกรรมศาสตรบัณฑิต สาขาวิชาวิศวกรรมคอมพิวเตอร์")
        );
        assert_eq!(
            fields.tuition_fee.as_deref(),
            Some("อัตราค่าเล่าเรียน 28,000.-/ภาคการศึกษา")
        );
    }

    #[test]
    fn test_first_locator_wins() {
        let doc = FakeDoc::default()
            .with(&selectors::UNIVERSITY_NAME[0], "มหาวิทยาลัยเชียงใหม่")
            .with(&selectors::UNIVERSITY_NAME[1], "เมนู");
        let page = page_with(doc);

        let got = tokio_test::block_on(first_visible_text(
            &page,
            selectors::UNIVERSITY_NAME,
            Duration::ZERO,
        ));
        assert_eq!(got.as_deref(), Some("มหาวิทยาลัยเชียงใหม่"));
    }

    #[test]
    fn test_missing_and_blank_fields_are_none() {
        let doc = FakeDoc::default().with(&selectors::COURSE_NAME[0], "   ");
        let page = page_with(doc);

        let fields = tokio_test::block_on(extract_details(&page, Duration::ZERO));
        assert_eq!(fields, RawDetailFields::default());
    }
}
