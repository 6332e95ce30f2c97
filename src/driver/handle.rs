//! Browser handle
//!
//! Wraps a driver and refuses every call when the driver kind is not supported.

use std::sync::Arc;

use crate::driver::traits::{BrowserDriver, DriverKind};
use crate::{Error, Result};

/// Shared browser handle held by a site and lent to its pages
#[derive(Debug, Clone)]
pub struct Browser {
    driver: Arc<dyn BrowserDriver>,
}

impl Browser {
    /// Wrap a driver
    pub fn new(driver: Arc<dyn BrowserDriver>) -> Self {
        Self { driver }
    }

    /// Kind of the wrapped driver
    pub fn kind(&self) -> DriverKind {
        self.driver.kind()
    }

    fn supported(&self) -> Result<&dyn BrowserDriver> {
        let kind = self.driver.kind();
        if kind.is_supported() {
            Ok(self.driver.as_ref())
        } else {
            Err(Error::browser_not_supported(format!(
                "'{}' is neither a DevTools nor a WebDriver browser",
                kind
            )))
        }
    }

    /// URL currently displayed
    pub async fn current_url(&self) -> Result<String> {
        self.supported()?.current_url().await
    }

    /// Navigate to URL
    pub async fn navigate(&self, url: &str) -> Result<()> {
        self.supported()?.navigate(url).await
    }

    /// Reload the current document
    pub async fn refresh(&self) -> Result<()> {
        self.supported()?.refresh().await
    }

    /// Check if the session is still open
    pub fn is_open(&self) -> Result<bool> {
        Ok(self.supported()?.is_open())
    }

    /// Close the session
    pub async fn close(&self) -> Result<()> {
        self.supported()?.close().await
    }

    /// Whether two handles share the same driver
    pub fn same_driver(&self, other: &Browser) -> bool {
        Arc::ptr_eq(&self.driver, &other.driver)
    }
}
