//! Session configuration for Page-Oxide
//!
//! Test harnesses usually describe the site under test and the browser to
//! drive it with in a TOML file or in `PAGE_OXIDE_*` environment variables.

use crate::driver::BrowserOptions;
use crate::{Error, Result};
use serde::Deserialize;
use std::env;

/// Site and browser settings for a test session
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Base URL of the site under test
    pub base_url: String,

    /// Driver platform: `devtools` or `webdriver`
    pub platform: String,

    /// Browser product: `chrome`, `chromium`, `edge`, `firefox` or `safari`
    pub browser: String,

    /// DevTools or WebDriver endpoint; the platform default when unset
    pub endpoint: Option<String>,

    /// Run the browser headless
    pub headless: bool,

    /// Window width in pixels
    pub window_width: u32,

    /// Window height in pixels
    pub window_height: u32,

    /// Extra browser command line arguments
    pub browser_args: Vec<String>,

    /// Site arguments used as fallback page placeholder values
    pub args: toml::Table,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            platform: "devtools".to_string(),
            browser: "chrome".to_string(),
            endpoint: None,
            headless: true,
            window_width: 1920,
            window_height: 1080,
            browser_args: Vec::new(),
            args: toml::Table::new(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = SessionConfig::default();

        if let Some(base_url) = lookup("PAGE_OXIDE_BASE_URL") {
            config.base_url = base_url;
        }

        if let Some(platform) = lookup("PAGE_OXIDE_PLATFORM") {
            config.platform = platform;
        }

        if let Some(browser) = lookup("PAGE_OXIDE_BROWSER") {
            config.browser = browser;
        }

        if let Some(endpoint) = lookup("PAGE_OXIDE_ENDPOINT") {
            config.endpoint = Some(endpoint);
        }

        if let Some(headless) = lookup("PAGE_OXIDE_HEADLESS") {
            config.headless = headless
                .parse()
                .map_err(|_| Error::configuration("Invalid PAGE_OXIDE_HEADLESS"))?;
        }

        if let Some(width) = lookup("PAGE_OXIDE_WINDOW_WIDTH") {
            config.window_width = width
                .parse()
                .map_err(|_| Error::configuration("Invalid PAGE_OXIDE_WINDOW_WIDTH"))?;
        }

        if let Some(height) = lookup("PAGE_OXIDE_WINDOW_HEIGHT") {
            config.window_height = height
                .parse()
                .map_err(|_| Error::configuration("Invalid PAGE_OXIDE_WINDOW_HEIGHT"))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::configuration(format!("Failed to read config file: {}", e)))?;

        let config: SessionConfig = toml::from_str(&content)
            .map_err(|e| Error::configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| Error::configuration(format!("Invalid base_url '{}': {}", self.base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https" | "file") {
            return Err(Error::configuration(format!(
                "Unsupported base_url scheme '{}'",
                parsed.scheme()
            )));
        }
        Ok(())
    }

    /// Arguments for `Site::new`: `base_url` plus the `[args]` table
    pub fn site_args(&self) -> Result<serde_json::Value> {
        let mut args = match serde_json::to_value(&self.args)? {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        args.insert(
            "base_url".to_string(),
            serde_json::Value::String(self.base_url.clone()),
        );
        Ok(serde_json::Value::Object(args))
    }

    /// Options passed to the browser driver
    pub fn browser_options(&self) -> BrowserOptions {
        BrowserOptions {
            headless: self.headless,
            window_width: self.window_width,
            window_height: self.window_height,
            args: self.browser_args.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}
