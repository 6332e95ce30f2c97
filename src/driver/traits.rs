//! Browser driver traits
//!
//! This module defines the boundary between the page layer and the library that
//! actually drives a browser.

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Kind of library behind a driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverKind {
    /// Chrome DevTools Protocol
    DevTools,
    /// W3C WebDriver
    WebDriver,
    /// Anything else; every boundary call through a `Browser` is refused
    Other(String),
}

impl DriverKind {
    /// Whether the page layer knows how to talk to this kind
    pub fn is_supported(&self) -> bool {
        matches!(self, DriverKind::DevTools | DriverKind::WebDriver)
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverKind::DevTools => write!(f, "devtools"),
            DriverKind::WebDriver => write!(f, "webdriver"),
            DriverKind::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Driver platform requested through `Site::open_browser`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    DevTools,
    WebDriver,
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "devtools" | "cdp" | "chromium" => Ok(Platform::DevTools),
            "webdriver" | "selenium" => Ok(Platform::WebDriver),
            other => Err(Error::invalid_argument(format!(
                "unsupported platform '{}', expected 'devtools' or 'webdriver'",
                other
            ))),
        }
    }
}

/// Browser product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserType {
    Chrome,
    Chromium,
    Edge,
    Firefox,
    Safari,
}

impl BrowserType {
    /// W3C `browserName` capability
    pub fn capability_name(&self) -> &'static str {
        match self {
            BrowserType::Chrome | BrowserType::Chromium => "chrome",
            BrowserType::Edge => "MicrosoftEdge",
            BrowserType::Firefox => "firefox",
            BrowserType::Safari => "safari",
        }
    }

    /// Whether the browser speaks the DevTools protocol
    pub fn is_chromium_family(&self) -> bool {
        matches!(self, BrowserType::Chrome | BrowserType::Chromium | BrowserType::Edge)
    }

    /// Conventional local driver endpoint
    pub fn default_webdriver_endpoint(&self) -> &'static str {
        match self {
            BrowserType::Chrome | BrowserType::Chromium => "http://localhost:9515",
            BrowserType::Edge => "http://localhost:9515",
            BrowserType::Firefox => "http://localhost:4444",
            BrowserType::Safari => "http://localhost:4445",
        }
    }
}

impl FromStr for BrowserType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chrome" => Ok(BrowserType::Chrome),
            "chromium" => Ok(BrowserType::Chromium),
            "edge" | "msedge" => Ok(BrowserType::Edge),
            "firefox" => Ok(BrowserType::Firefox),
            "safari" => Ok(BrowserType::Safari),
            other => Err(Error::invalid_argument(format!("unsupported browser type '{}'", other))),
        }
    }
}

/// Options for opening a browser
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Headless mode (no GUI)
    pub headless: bool,
    /// Window width
    pub window_width: u32,
    /// Window height
    pub window_height: u32,
    /// Additional arguments passed to the browser
    pub args: Vec<String>,
    /// Driver endpoint (DevTools HTTP/WS endpoint or WebDriver server URL)
    pub endpoint: Option<String>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            args: vec![],
            endpoint: None,
        }
    }
}

/// Browser driver trait
///
/// The minimal set of operations the page layer needs from a browser library.
#[async_trait]
pub trait BrowserDriver: Send + Sync + fmt::Debug {
    /// Library behind this driver
    fn kind(&self) -> DriverKind;

    /// URL currently displayed
    async fn current_url(&self) -> Result<String, crate::Error>;

    /// Navigate to URL and wait for it to load
    async fn navigate(&self, url: &str) -> Result<(), crate::Error>;

    /// Reload the current document
    async fn refresh(&self) -> Result<(), crate::Error>;

    /// Check if the browser session is still open
    fn is_open(&self) -> bool;

    /// Close the browser session
    async fn close(&self) -> Result<(), crate::Error>;
}
