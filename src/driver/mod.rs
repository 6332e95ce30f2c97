//! # Browser driver layer
//!
//! The boundary between pages and the library that actually drives a browser.
//!
//! ## Module structure
//! - `traits`: `BrowserDriver` and the platform/browser/option types
//! - `handle`: `Browser`, the shared handle that gates unsupported drivers
//! - `devtools`: Chrome DevTools Protocol driver
//! - `webdriver`: W3C WebDriver driver
//! - `mock`: in-memory driver for tests

pub mod devtools;
pub mod handle;
pub mod mock;
pub mod traits;
pub mod webdriver;

use std::sync::Arc;

pub use devtools::DevToolsDriver;
pub use handle::Browser;
pub use mock::MockDriver;
pub use traits::{BrowserDriver, BrowserOptions, BrowserType, DriverKind, Platform};
pub use webdriver::WebDriverDriver;

/// Open a browser on the given platform
pub async fn open(platform: Platform, browser_type: BrowserType, options: &BrowserOptions) -> crate::Result<Browser> {
    let driver: Arc<dyn BrowserDriver> = match platform {
        Platform::DevTools => Arc::new(DevToolsDriver::launch(browser_type, options).await?),
        Platform::WebDriver => Arc::new(WebDriverDriver::launch(browser_type, options).await?),
    };
    Ok(Browser::new(driver))
}
