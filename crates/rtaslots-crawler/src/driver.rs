//! The thirtyfour-backed automation session.
//!
//! One `DriverSession` wraps one WebDriver-controlled Chrome for the whole
//! run. Construction applies a freshly randomized identity (user agent,
//! window size, optional proxy) and scrubs the most common automation
//! fingerprints before the first navigation.

use std::time::Duration;

use thirtyfour::components::SelectElement;
use thirtyfour::prelude::*;
use thirtyfour::{By, DesiredCapabilities, WebDriver};

use rtaslots_core::CrawlConfig;

use crate::identity;
use crate::session::{LocationOption, Locator, Session, SessionError};

const WEBDRIVER_SCRUB_SCRIPT: &str =
    "Object.defineProperty(navigator, 'webdriver', {get: () => undefined})";

pub struct DriverSession {
    driver: WebDriver,
    timeout: Duration,
    poll: Duration,
}

impl DriverSession {
    /// Build a browser session against the configured webdriver endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WebDriver`] if the browser cannot be started
    /// or the fingerprint scrub script fails.
    pub async fn connect(config: &CrawlConfig, proxy: Option<&str>) -> Result<Self, SessionError> {
        let identity = identity::randomize();

        let mut caps = DesiredCapabilities::chrome();
        if config.headless {
            caps.add_arg("--headless=new")?;
        }
        caps.add_arg("--no-sandbox")?;
        caps.add_arg("--disable-dev-shm-usage")?;
        caps.add_arg("--disable-gpu")?;
        caps.add_arg("--disable-blink-features=AutomationControlled")?;
        caps.add_arg(&format!(
            "--window-size={},{}",
            identity.window_width, identity.window_height
        ))?;
        caps.add_arg(&format!("--user-agent={}", identity.user_agent))?;
        if let Some(proxy) = proxy {
            caps.add_arg(&format!("--proxy-server={proxy}"))?;
        }

        let driver = WebDriver::new(config.webdriver_url.as_str(), caps).await?;
        driver.execute(WEBDRIVER_SCRUB_SCRIPT, Vec::new()).await?;

        Ok(Self {
            driver,
            timeout: Duration::from_secs(config.element_timeout_secs),
            poll: Duration::from_millis(config.poll_interval_ms),
        })
    }

    fn by(locator: &Locator) -> By {
        match locator {
            Locator::Id(v) => By::Id(v.as_str()),
            Locator::Css(v) => By::Css(v.as_str()),
            Locator::XPath(v) => By::XPath(v.as_str()),
        }
    }

    fn wait_failed(locator: &Locator) -> SessionError {
        SessionError::Timeout {
            locator: locator.to_string(),
        }
    }

    /// Wait (bounded) for the first element matching `locator`.
    async fn first(&self, locator: &Locator) -> Result<WebElement, SessionError> {
        self.driver
            .query(Self::by(locator))
            .wait(self.timeout, self.poll)
            .first()
            .await
            .map_err(|_| Self::wait_failed(locator))
    }

    /// Wait (bounded) for the first matching element to become visible.
    async fn first_visible(&self, locator: &Locator) -> Result<WebElement, SessionError> {
        let element = self.first(locator).await?;
        element
            .wait_until()
            .wait(self.timeout, self.poll)
            .displayed()
            .await
            .map_err(|_| Self::wait_failed(locator))?;
        Ok(element)
    }
}

impl Session for DriverSession {
    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn wait_present(&self, locator: &Locator) -> Result<(), SessionError> {
        self.first(locator).await.map(|_| ())
    }

    async fn click(&self, locator: &Locator) -> Result<(), SessionError> {
        let element = self.first_visible(locator).await?;
        element.click().await?;
        Ok(())
    }

    async fn type_text(&self, locator: &Locator, text: &str) -> Result<(), SessionError> {
        let element = self.first_visible(locator).await?;
        element.send_keys(text).await?;
        Ok(())
    }

    async fn select_by_visible_text(
        &self,
        locator: &Locator,
        text: &str,
    ) -> Result<(), SessionError> {
        let element = self.first_visible(locator).await?;
        let select = SelectElement::new(&element)
            .await
            .map_err(|_| SessionError::NotASelect {
                locator: locator.to_string(),
            })?;
        select.select_by_exact_text(text).await?;
        Ok(())
    }

    async fn select_options(
        &self,
        locator: &Locator,
    ) -> Result<Vec<LocationOption>, SessionError> {
        let element = self.first(locator).await?;
        let select = SelectElement::new(&element)
            .await
            .map_err(|_| SessionError::NotASelect {
                locator: locator.to_string(),
            })?;
        let mut options = Vec::new();
        for option in select.options().await? {
            let text = option.text().await?;
            let enabled = option.is_enabled().await?;
            options.push(LocationOption { text, enabled });
        }
        Ok(options)
    }

    async fn read_text(&self, locator: &Locator) -> Result<String, SessionError> {
        let element = self.first_visible(locator).await?;
        Ok(element.text().await?)
    }

    async fn read_texts(
        &self,
        locator: &Locator,
    ) -> Result<Vec<Result<String, SessionError>>, SessionError> {
        let elements = self.driver.find_all(Self::by(locator)).await?;
        let mut reads = Vec::with_capacity(elements.len());
        for element in elements {
            reads.push(element.text().await.map_err(|_| SessionError::Stale {
                locator: locator.to_string(),
            }));
        }
        Ok(reads)
    }

    async fn title(&self) -> Result<String, SessionError> {
        Ok(self.driver.title().await?)
    }

    async fn current_url(&self) -> Result<String, SessionError> {
        Ok(self.driver.current_url().await?.to_string())
    }

    async fn page_source(&self) -> Result<String, SessionError> {
        Ok(self.driver.source().await?)
    }

    async fn close(self) -> Result<(), SessionError> {
        self.driver.quit().await?;
        Ok(())
    }
}
