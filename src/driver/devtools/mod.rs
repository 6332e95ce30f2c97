//! DevTools driver
//!
//! Drives a Chromium-family browser that was started with a remote debugging
//! port. Opening the driver creates a fresh target (tab) through the endpoint's
//! HTTP API and talks CDP to it over a WebSocket.

pub mod connection;
pub mod types;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::driver::traits::{BrowserDriver, BrowserOptions, BrowserType, DriverKind};
use crate::{Error, Result};
use connection::DevToolsConnection;
use types::{EvaluateParams, EvaluateResult, NavigateParams, ReloadParams, TargetDescriptor};

/// Default remote debugging endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:9222";

/// CDP-backed browser driver
#[derive(Debug)]
pub struct DevToolsDriver {
    endpoint: String,
    target_id: String,
    connection: Arc<DevToolsConnection>,
}

impl DevToolsDriver {
    /// Open a new tab on the browser behind `options.endpoint`
    pub async fn launch(browser_type: BrowserType, options: &BrowserOptions) -> Result<Self> {
        if !browser_type.is_chromium_family() {
            return Err(Error::invalid_argument(format!(
                "{:?} cannot be driven over DevTools",
                browser_type
            )));
        }

        let endpoint = http_endpoint(options.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT))?;
        let target = create_target(&endpoint).await?;
        info!("Created DevTools target {} on {}", target.id, endpoint);

        let connection = DevToolsConnection::connect(target.web_socket_debugger_url.clone()).await?;
        let driver = Self {
            endpoint,
            target_id: target.id,
            connection,
        };

        driver.connection.send_command("Page.enable", serde_json::Value::Null).await?;
        driver.connection.send_command("Runtime.enable", serde_json::Value::Null).await?;
        driver
            .connection
            .send_command(
                "Emulation.setDeviceMetricsOverride",
                serde_json::json!({
                    "width": options.window_width,
                    "height": options.window_height,
                    "deviceScaleFactor": 1.0,
                    "mobile": false,
                }),
            )
            .await?;
        if !options.args.is_empty() {
            debug!("Browser arguments are ignored for an already running DevTools browser");
        }

        Ok(driver)
    }

    /// Target driven by this instance
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// HTTP endpoint of the browser
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn evaluate_string(&self, expression: &str) -> Result<String> {
        let params = serde_json::to_value(EvaluateParams {
            expression: expression.to_string(),
            return_by_value: true,
        })?;
        let raw = self.connection.send_command("Runtime.evaluate", params).await?;
        let evaluated: EvaluateResult = serde_json::from_value(raw)?;

        if let Some(exception) = evaluated.exception_details {
            return Err(Error::cdp(format!("'{}' threw: {}", expression, exception)));
        }
        match (evaluated.result.r#type.as_str(), evaluated.result.value) {
            ("string", Some(serde_json::Value::String(value))) => Ok(value),
            (kind, _) => Err(Error::cdp(format!(
                "'{}' evaluated to {} instead of a string",
                expression, kind
            ))),
        }
    }

    async fn wait_for_load(&self) -> Result<()> {
        wait_until_complete(
            || self.connection.is_active(),
            || self.evaluate_string("document.readyState"),
        )
        .await
    }
}

/// Poll `ready_state` until it reports `complete`.
///
/// Failed polls are retried while the connection is up; once it is down the
/// failure is returned.
async fn wait_until_complete<A, P, Fut>(is_active: A, mut ready_state: P) -> Result<()>
where
    A: Fn() -> bool,
    P: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<String>>,
{
    for attempt in 0..50 {
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        match ready_state().await {
            Ok(state) if state == "complete" => {
                debug!("Document complete after {} polls", attempt + 1);
                return Ok(());
            }
            Ok(state) => debug!("Document state on poll {}: {}", attempt + 1, state),
            Err(e) if !is_active() => return Err(e),
            Err(e) => debug!("Ready state check {} failed: {}", attempt + 1, e),
        }
    }
    warn!("Document did not reach readyState=complete, continuing anyway");
    Ok(())
}

#[async_trait]
impl BrowserDriver for DevToolsDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::DevTools
    }

    async fn current_url(&self) -> Result<String> {
        self.evaluate_string("window.location.href").await
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        info!("Navigating to {}", url);
        let params = serde_json::to_value(NavigateParams { url: url.to_string() })?;
        let result = self.connection.send_command("Page.navigate", params).await?;
        if let Some(error_text) = result.get("errorText").and_then(|v| v.as_str()) {
            return Err(Error::cdp(format!("Navigation to {} failed: {}", url, error_text)));
        }
        self.wait_for_load().await
    }

    async fn refresh(&self) -> Result<()> {
        let params = serde_json::to_value(ReloadParams { ignore_cache: false })?;
        self.connection.send_command("Page.reload", params).await?;
        self.wait_for_load().await
    }

    fn is_open(&self) -> bool {
        self.connection.is_active()
    }

    async fn close(&self) -> Result<()> {
        info!("Closing DevTools target {}", self.target_id);
        if let Err(e) = self.connection.send_command("Page.close", serde_json::json!({})).await {
            warn!("Page.close failed for target {}: {}", self.target_id, e);
        }
        self.connection.close().await
    }
}

/// Normalize a DevTools endpoint to its HTTP form without a trailing slash
pub fn http_endpoint(endpoint: &str) -> Result<String> {
    let mut parsed = url::Url::parse(endpoint)
        .map_err(|e| Error::invalid_argument(format!("invalid DevTools endpoint '{}': {}", endpoint, e)))?;

    let scheme = match parsed.scheme() {
        "ws" | "http" => "http",
        "wss" | "https" => "https",
        other => {
            return Err(Error::invalid_argument(format!(
                "unsupported DevTools endpoint scheme '{}'",
                other
            )))
        }
    };
    parsed
        .set_scheme(scheme)
        .map_err(|_| Error::invalid_argument(format!("cannot convert '{}' to HTTP", endpoint)))?;
    parsed.set_path("");
    parsed.set_query(None);

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

async fn create_target(endpoint: &str) -> Result<TargetDescriptor> {
    let new_url = format!("{}/json/new?about:blank", endpoint);
    debug!("Creating new page via HTTP API: {}", new_url);

    let response = reqwest::Client::new().put(&new_url).send().await.map_err(|e| {
        Error::http(format!(
            "Failed to reach DevTools endpoint {} (start the browser with --remote-debugging-port): {}",
            endpoint, e
        ))
    })?;
    let body = response.text().await?;

    serde_json::from_str(&body)
        .map_err(|e| Error::cdp(format!("Unexpected /json/new response ({}): {}", e, body)))
}
