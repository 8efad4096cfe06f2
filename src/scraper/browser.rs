use async_trait::async_trait;
use std::time::Duration;
use thirtyfour::prelude::*;
use thirtyfour::WindowHandle;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::scraper::selectors::Locator;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

// ── Session traits ────────────────────────────────────────────────────────────

/// One browser tab.
#[async_trait]
pub trait Page: Send + Sync {
    async fn goto(&self, url: &str) -> Result<(), ScrapeError>;

    /// Trimmed text of the first element matching `locator` that becomes
    /// visible within `timeout`. Empty text counts as no match.
    async fn visible_text(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Option<String>, ScrapeError>;

    /// Clear the first visible element matching `locator`, type `text`, press
    /// Enter. Returns `false` if nothing became visible within `timeout`.
    async fn type_and_submit(
        &self,
        locator: &Locator,
        text: &str,
        timeout: Duration,
    ) -> Result<bool, ScrapeError>;

    /// Wait until `locator` matches a visible element.
    async fn wait_visible(&self, locator: &Locator, timeout: Duration) -> Result<bool, ScrapeError>;

    async fn source(&self) -> Result<String, ScrapeError>;

    async fn close(self: Box<Self>) -> Result<(), ScrapeError>;
}

#[async_trait]
pub trait Browser: Send + Sync {
    async fn new_page(&self) -> Result<Box<dyn Page>, ScrapeError>;
    async fn quit(self: Box<Self>) -> Result<(), ScrapeError>;
}

// ── WebDriver implementation ──────────────────────────────────────────────────

pub struct WebDriverBrowser {
    driver: WebDriver,
    home: WindowHandle,
}

impl WebDriverBrowser {
    /// Connect to the WebDriver endpoint. Failure here ends the run.
    pub async fn launch(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let mut args = vec!["--no-sandbox", "--disable-dev-shm-usage", "--window-size=1920,1080"];
        if config.headless {
            args.push("--headless=new");
        }
        let mut caps = DesiredCapabilities::chrome();
        caps.add_chrome_option("args", args)?;

        info!("Connecting to WebDriver at {}", config.webdriver_url);
        let driver = WebDriver::new(&config.webdriver_url, caps).await?;
        driver.set_page_load_timeout(config.page_load_timeout()).await?;
        let home = driver.window().await?;

        Ok(Self { driver, home })
    }
}

#[async_trait]
impl Browser for WebDriverBrowser {
    async fn new_page(&self) -> Result<Box<dyn Page>, ScrapeError> {
        let window = self.driver.new_tab().await?;
        self.driver.switch_to_window(window.clone()).await?;
        debug!("Opened tab {:?}", window);
        Ok(Box::new(WebDriverPage {
            driver: self.driver.clone(),
            window,
            home: self.home.clone(),
        }))
    }

    async fn quit(self: Box<Self>) -> Result<(), ScrapeError> {
        self.driver.quit().await?;
        info!("Browser closed");
        Ok(())
    }
}

/// A tab inside the shared WebDriver session. Every call focuses the tab
/// first since the session has a single current window.
pub struct WebDriverPage {
    driver: WebDriver,
    window: WindowHandle,
    home: WindowHandle,
}

impl WebDriverPage {
    async fn focus(&self) -> Result<(), ScrapeError> {
        self.driver.switch_to_window(self.window.clone()).await?;
        Ok(())
    }

    fn by(locator: &Locator) -> By {
        match *locator {
            Locator::Css(s) => By::Css(s),
            Locator::XPath(s) => By::XPath(s),
        }
    }

    async fn first_visible(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Option<WebElement>, ScrapeError> {
        self.focus().await?;
        let elem = self
            .driver
            .query(Self::by(locator))
            .wait(timeout, POLL_INTERVAL)
            .and_displayed()
            .first_opt()
            .await?;
        Ok(elem)
    }
}

#[async_trait]
impl Page for WebDriverPage {
    async fn goto(&self, url: &str) -> Result<(), ScrapeError> {
        self.focus().await?;
        self.driver
            .goto(url)
            .await
            .map_err(|e| ScrapeError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    async fn visible_text(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Option<String>, ScrapeError> {
        let Some(elem) = self.first_visible(locator, timeout).await? else {
            return Ok(None);
        };
        let text = elem.text().await?.trim().to_string();
        Ok(if text.is_empty() { None } else { Some(text) })
    }

    async fn type_and_submit(
        &self,
        locator: &Locator,
        text: &str,
        timeout: Duration,
    ) -> Result<bool, ScrapeError> {
        let Some(input) = self.first_visible(locator, timeout).await? else {
            return Ok(false);
        };
        input.click().await?;
        input.clear().await?;
        input.send_keys(text).await?;
        input.send_keys(Key::Enter.to_string()).await?;
        Ok(true)
    }

    async fn wait_visible(&self, locator: &Locator, timeout: Duration) -> Result<bool, ScrapeError> {
        Ok(self.first_visible(locator, timeout).await?.is_some())
    }

    async fn source(&self) -> Result<String, ScrapeError> {
        self.focus().await?;
        Ok(self.driver.source().await?)
    }

    async fn close(self: Box<Self>) -> Result<(), ScrapeError> {
        // close_window acts on the current window; still try it if focus fails
        if let Err(e) = self.focus().await {
            warn!("Could not focus tab {:?} before closing: {}", self.window, e);
        }
        self.driver.close_window().await?;
        if let Err(e) = self.driver.switch_to_window(self.home.clone()).await {
            warn!("Could not return to home window: {}", e);
        }
        Ok(())
    }
}


// ── Test double ───────────────────────────────────────────────────────────────
