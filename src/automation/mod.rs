//! The only bridge to the live site: a small capability trait over the
//! WebDriver session. Waits take a bounded timeout and return an absent
//! result on expiry; the caller decides what absence means.

mod webdriver;

pub use webdriver::WebDriverSession;

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AppError;

/// How an element is located on the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Id(String),
    ClassName(String),
    XPath(String),
}

impl Target {
    pub fn id(id: impl Into<String>) -> Target {
        Target::Id(id.into())
    }

    pub fn class(name: impl Into<String>) -> Target {
        Target::ClassName(name.into())
    }

    pub fn xpath(expr: impl Into<String>) -> Target {
        Target::XPath(expr.into())
    }
}

#[async_trait]
pub trait Automation {
    async fn goto(&self, url: &str) -> Result<(), AppError>;

    async fn click(&self, target: &Target) -> Result<(), AppError>;

    /// Clicks the `index`-th element matching `target`, in document order.
    async fn click_nth(&self, target: &Target, index: usize) -> Result<(), AppError>;

    async fn type_text(&self, target: &Target, text: &str) -> Result<(), AppError>;

    async fn text_of(&self, target: &Target) -> Result<String, AppError>;

    /// Text of every element matching `target`, in document order.
    async fn texts_of(&self, target: &Target) -> Result<Vec<String>, AppError>;

    async fn exists(&self, target: &Target) -> bool;

    /// Polls until the element is present, yielding its text, or `None`
    /// once the timeout expires.
    async fn wait_present(&self, target: &Target, timeout: Duration) -> Option<String>;

    /// Polls until the element is displayed and enabled; `false` once
    /// the timeout expires.
    async fn wait_clickable(&self, target: &Target, timeout: Duration) -> bool;

    /// Accepts a native confirmation prompt if one is open.
    async fn accept_alert(&self);

    async fn screenshot(&self, path: &Path) -> Result<(), AppError>;
}

/// Browser the WebDriver session is asked for. Anything unrecognized
/// falls back to the platform default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    Firefox,
    Chrome,
    Edge,
    Safari,
}

impl BrowserKind {
    /// Resolves a browser name, case-insensitively. Unrecognized names
    /// warn and resolve to the platform default; both the CLI and the
    /// config file go through here.
    pub fn from_name(name: &str) -> BrowserKind {
        match name.to_lowercase().as_str() {
            "firefox" => BrowserKind::Firefox,
            "chrome" | "chromium" => BrowserKind::Chrome,
            "edge" => BrowserKind::Edge,
            "safari" => BrowserKind::Safari,
            other => {
                let fallback = BrowserKind::platform_default();
                warn!(browser = other, ?fallback, "unrecognized browser, using the platform default");
                fallback
            }
        }
    }
    /// Default browser for the current platform.
    pub fn platform_default() -> BrowserKind {
        if cfg!(target_os = "windows") {
            BrowserKind::Edge
        } else if cfg!(target_os = "macos") {
            BrowserKind::Safari
        } else {
            BrowserKind::Firefox
        }
    }

    /// The W3C `browserName` capability value.
    pub fn capability_name(self) -> &'static str {
        match self {
            BrowserKind::Firefox => "firefox",
            BrowserKind::Chrome => "chrome",
            BrowserKind::Edge => "MicrosoftEdge",
            BrowserKind::Safari => "safari",
        }
    }
}

impl Default for BrowserKind {
    fn default() -> Self {
        BrowserKind::platform_default()
    }
}

impl FromStr for BrowserKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(BrowserKind::from_name(s))
    }
}

impl<'de> Deserialize<'de> for BrowserKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(BrowserKind::from_name(&name))
    }
}
