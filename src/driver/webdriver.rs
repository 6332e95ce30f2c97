//! W3C WebDriver driver
//!
//! Talks to chromedriver, geckodriver, safaridriver or a Selenium server over
//! the W3C HTTP protocol.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

use crate::driver::traits::{BrowserDriver, BrowserOptions, BrowserType, DriverKind};
use crate::{Error, Result};

/// WebDriver-backed browser driver
#[derive(Debug)]
pub struct WebDriverDriver {
    endpoint: String,
    session_id: String,
    http: reqwest::Client,
    is_open: AtomicBool,
}

impl WebDriverDriver {
    /// Start a new WebDriver session
    pub async fn launch(browser_type: BrowserType, options: &BrowserOptions) -> Result<Self> {
        let endpoint = options
            .endpoint
            .clone()
            .unwrap_or_else(|| browser_type.default_webdriver_endpoint().to_string())
            .trim_end_matches('/')
            .to_string();
        let http = reqwest::Client::new();

        info!("Starting {:?} WebDriver session on {}", browser_type, endpoint);
        let response = http
            .post(format!("{}/session", endpoint))
            .json(&capabilities(browser_type, options))
            .send()
            .await
            .map_err(|e| Error::http(format!("Cannot reach WebDriver at {}: {}", endpoint, e)))?;
        let body: Value = response.json().await?;
        let value = unwrap_value(body)?;

        let session_id = value
            .get("sessionId")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::webdriver("new session response has no sessionId"))?
            .to_string();
        debug!("WebDriver session {} started", session_id);

        Ok(Self {
            endpoint,
            session_id,
            http,
            is_open: AtomicBool::new(true),
        })
    }

    /// Drive a session that is already running on `endpoint`
    pub fn attach<E: Into<String>, S: Into<String>>(endpoint: E, session_id: S) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            session_id: session_id.into(),
            http: reqwest::Client::new(),
            is_open: AtomicBool::new(true),
        }
    }

    /// Session driven by this instance
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn session_url(&self, command: &str) -> String {
        if command.is_empty() {
            format!("{}/session/{}", self.endpoint, self.session_id)
        } else {
            format!("{}/session/{}/{}", self.endpoint, self.session_id, command)
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let body: Value = request.send().await?.json().await?;
        unwrap_value(body)
    }
}

#[async_trait]
impl BrowserDriver for WebDriverDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::WebDriver
    }

    async fn current_url(&self) -> Result<String> {
        let value = self.send(self.http.get(self.session_url("url"))).await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::webdriver(format!("current URL is not a string: {}", value)))
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        info!("Navigating to {}", url);
        self.send(self.http.post(self.session_url("url")).json(&json!({ "url": url })))
            .await?;
        Ok(())
    }

    async fn refresh(&self) -> Result<()> {
        self.send(self.http.post(self.session_url("refresh")).json(&json!({})))
            .await?;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.is_open.load(Ordering::SeqCst)
    }

    async fn close(&self) -> Result<()> {
        info!("Deleting WebDriver session {}", self.session_id);
        self.send(self.http.delete(self.session_url(""))).await?;
        self.is_open.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// New-session payload for a browser type
pub fn capabilities(browser_type: BrowserType, options: &BrowserOptions) -> Value {
    let mut args = options.args.clone();
    let window = format!("--window-size={},{}", options.window_width, options.window_height);

    let mut always_match = json!({ "browserName": browser_type.capability_name() });
    match browser_type {
        BrowserType::Chrome | BrowserType::Chromium | BrowserType::Edge => {
            if options.headless {
                args.push("--headless=new".to_string());
            }
            args.push(window);
            let key = if browser_type == BrowserType::Edge {
                "ms:edgeOptions"
            } else {
                "goog:chromeOptions"
            };
            always_match[key] = json!({ "args": args });
        }
        BrowserType::Firefox => {
            if options.headless {
                args.push("-headless".to_string());
            }
            args.push(format!("--width={}", options.window_width));
            args.push(format!("--height={}", options.window_height));
            always_match["moz:firefoxOptions"] = json!({ "args": args });
        }
        BrowserType::Safari => {}
    }

    json!({ "capabilities": { "alwaysMatch": always_match } })
}

/// Extract `value` from a W3C response, turning error payloads into errors
fn unwrap_value(body: Value) -> Result<Value> {
    let value = body.get("value").cloned().unwrap_or(Value::Null);
    if let Some(error) = value.get("error").and_then(|v| v.as_str()) {
        let message = value.get("message").and_then(|v| v.as_str()).unwrap_or("");
        return Err(Error::webdriver(format!("{}: {}", error, message)));
    }
    Ok(value)
}
