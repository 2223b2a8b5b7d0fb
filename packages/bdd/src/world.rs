use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use cucumber::World;
use thirtyfour::prelude::*;

/// How long steps poll for an element before giving up.
const FIND_TIMEOUT: Duration = Duration::from_secs(10);
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Shared state for one scenario: a lazily started WebDriver session plus
/// whatever the steps remember between each other.
#[derive(World)]
#[world(init = Self::new)]
pub struct BddWorld {
    driver: Option<WebDriver>,
    pub base_url: String,
    webdriver_url: String,
    /// Invitation code captured after creating a season.
    pub invitation_code: Option<String>,
    /// Season title used by the current scenario.
    pub season_title: Option<String>,
}

impl fmt::Debug for BddWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BddWorld")
            .field("base_url", &self.base_url)
            .field("driver", &self.driver.is_some())
            .field("invitation_code", &self.invitation_code)
            .field("season_title", &self.season_title)
            .finish()
    }
}

impl BddWorld {
    fn new() -> Self {
        Self {
            driver: None,
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            webdriver_url: std::env::var("WEBDRIVER_URL")
                .unwrap_or_else(|_| "http://localhost:4444".to_string()),
            invitation_code: None,
            season_title: None,
        }
    }

    /// The scenario's WebDriver session, started on first use.
    pub async fn driver(&mut self) -> Result<&WebDriver> {
        if self.driver.is_none() {
            let mut caps = DesiredCapabilities::chrome();
            caps.add_arg("--headless=new")?;
            caps.add_arg("--window-size=390,844")?; // Mobile-first frontend.
            let driver = WebDriver::new(&self.webdriver_url, caps)
                .await
                .context("connecting to the WebDriver endpoint")?;
            self.driver = Some(driver);
        }
        Ok(self.driver.as_ref().expect("driver just set"))
    }

    /// End the browser session. Called from the after-scenario hook.
    pub async fn quit(&mut self) {
        if let Some(driver) = self.driver.take() {
            let _ = driver.quit().await;
        }
    }

    pub async fn goto(&mut self, path: &str) -> Result<()> {
        let url = format!("{}{}", self.base_url, path);
        self.driver().await?.goto(&url).await?;
        Ok(())
    }

    /// Find the first displayed element matching any of the selectors,
    /// polling until the frontend has rendered it.
    pub async fn find_any(&mut self, selectors: &[&str]) -> Result<WebElement> {
        let driver = self.driver().await?.clone();
        let deadline = std::time::Instant::now() + FIND_TIMEOUT;

        loop {
            for selector in selectors {
                if let Ok(element) = driver.find(By::Css(*selector)).await
                    && element.is_displayed().await.unwrap_or(false)
                {
                    return Ok(element);
                }
            }
            if std::time::Instant::now() >= deadline {
                bail!("no element matched any of {selectors:?} within {FIND_TIMEOUT:?}");
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    pub async fn fill(&mut self, selectors: &[&str], text: &str) -> Result<()> {
        let element = self.find_any(selectors).await?;
        element.clear().await?;
        element.send_keys(text).await?;
        Ok(())
    }

    pub async fn click(&mut self, selectors: &[&str]) -> Result<()> {
        self.find_any(selectors).await?.click().await?;
        Ok(())
    }

    pub async fn text_of(&mut self, selectors: &[&str]) -> Result<String> {
        Ok(self.find_any(selectors).await?.text().await?)
    }

    /// Page body text, for coarse "I should see ..." assertions.
    pub async fn page_text(&mut self) -> Result<String> {
        let driver = self.driver().await?;
        let body = driver.find(By::Tag("body")).await?;
        Ok(body.text().await?)
    }
}
