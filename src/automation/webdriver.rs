use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use tracing::debug;

use super::{Automation, BrowserKind, Target};
use crate::error::AppError;

/// How often the wait helpers re-check the page.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Fantoccini-backed session; one per process lifetime.
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    pub async fn connect(webdriver_url: &str, browser: BrowserKind) -> Result<Self, AppError> {
        let mut capabilities = serde_json::map::Map::new();
        capabilities.insert("browserName".to_string(), json!(browser.capability_name()));

        let client = ClientBuilder::native()
            .capabilities(capabilities)
            .connect(webdriver_url)
            .await
            .map_err(AppError::browser)?;

        Ok(Self { client })
    }

    pub async fn close(self) -> Result<(), AppError> {
        self.client.close().await.map_err(AppError::browser)
    }

    async fn find(&self, target: &Target) -> Result<Element, CmdError> {
        match target {
            Target::Id(id) => self.client.find(Locator::Id(id.as_str())).await,
            Target::ClassName(name) => {
                let css = format!(".{name}");
                self.client.find(Locator::Css(&css)).await
            }
            Target::XPath(expr) => self.client.find(Locator::XPath(expr.as_str())).await,
        }
    }

    async fn find_all(&self, target: &Target) -> Result<Vec<Element>, CmdError> {
        match target {
            Target::Id(id) => self.client.find_all(Locator::Id(id.as_str())).await,
            Target::ClassName(name) => {
                let css = format!(".{name}");
                self.client.find_all(Locator::Css(&css)).await
            }
            Target::XPath(expr) => self.client.find_all(Locator::XPath(expr.as_str())).await,
        }
    }
}

#[async_trait]
impl Automation for WebDriverSession {
    async fn goto(&self, url: &str) -> Result<(), AppError> {
        self.client.goto(url).await.map_err(AppError::browser)
    }

    async fn click(&self, target: &Target) -> Result<(), AppError> {
        self.find(target)
            .await
            .map_err(AppError::browser)?
            .click()
            .await
            .map_err(AppError::browser)
    }

    async fn click_nth(&self, target: &Target, index: usize) -> Result<(), AppError> {
        let elements = self.find_all(target).await.map_err(AppError::browser)?;
        let element = elements.get(index).ok_or_else(|| {
            AppError::BrowserError(format!("no element {index} matching {target:?}"))
        })?;
        element.click().await.map_err(AppError::browser)
    }

    async fn type_text(&self, target: &Target, text: &str) -> Result<(), AppError> {
        self.find(target)
            .await
            .map_err(AppError::browser)?
            .send_keys(text)
            .await
            .map_err(AppError::browser)
    }

    async fn text_of(&self, target: &Target) -> Result<String, AppError> {
        self.find(target)
            .await
            .map_err(AppError::browser)?
            .text()
            .await
            .map_err(AppError::browser)
    }

    async fn texts_of(&self, target: &Target) -> Result<Vec<String>, AppError> {
        let elements = self.find_all(target).await.map_err(AppError::browser)?;
        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            texts.push(element.text().await.map_err(AppError::browser)?);
        }
        Ok(texts)
    }

    async fn exists(&self, target: &Target) -> bool {
        self.find(target).await.is_ok()
    }

    async fn wait_present(&self, target: &Target, timeout: Duration) -> Option<String> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Ok(element) = self.find(target).await {
                if let Ok(text) = element.text().await {
                    return Some(text);
                }
            }
            if Instant::now() >= deadline {
                debug!(?target, "timed out waiting for element");
                return None;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn wait_clickable(&self, target: &Target, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if let Ok(element) = self.find(target).await {
                let displayed = element.is_displayed().await.unwrap_or(false);
                let enabled = element.is_enabled().await.unwrap_or(false);
                if displayed && enabled {
                    return true;
                }
            }
            if Instant::now() >= deadline {
                debug!(?target, "timed out waiting for clickable element");
                return false;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn accept_alert(&self) {
        // No alert open is fine; the duplicate-cancel flow only sometimes
        // raises one.
        if let Err(err) = self.client.accept_alert().await {
            debug!(%err, "no alert to accept");
        }
    }

    async fn screenshot(&self, path: &Path) -> Result<(), AppError> {
        let png = self.client.screenshot().await.map_err(AppError::browser)?;
        tokio::fs::write(path, png).await?;
        Ok(())
    }
}
