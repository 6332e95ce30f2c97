//! # Site
//!
//! A `Site` ties a set of page definitions to a base URL and a browser. It
//! builds pages by name, works out which page the browser is showing and
//! forwards calls it does not answer itself to that page.
//!
//! ## Module structure
//! - `definition`: `SiteDefinition`, the registered pages and features
//! - `resolver`: current page resolution and `PageRef`
//! - `router`: call forwarding
//! - `accessors`: the `page_accessors!` macro for typed per-page methods

pub mod accessors;
pub mod definition;
pub mod resolver;
pub(crate) mod router;
pub(crate) mod state;

#[cfg(test)]
pub mod tests;

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::driver::{self, Browser, BrowserOptions, BrowserType, Platform};
use crate::page::{PageArgs, PageDescriptor, PageInstance};
use crate::{Error, Result};

pub use definition::SiteDefinition;
pub use resolver::PageRef;
pub(crate) use state::SiteState;

use resolver::PageResolver;

/// Handle to a site; clones share the same browser and most recent page
#[derive(Clone)]
pub struct Site {
    state: Arc<SiteState>,
}

impl Site {
    /// Create a site from its definition and arguments.
    ///
    /// `args` must be an object with a `base_url` string. Every other key is
    /// kept as a fallback value for page placeholders.
    pub fn new(definition: Arc<SiteDefinition>, args: Value) -> Result<Self> {
        let state = SiteState::new(definition, args, None)?;
        Ok(Self { state: Arc::new(state) })
    }

    /// Create a site that drives an already open browser
    pub fn with_browser(definition: Arc<SiteDefinition>, args: Value, browser: Browser) -> Result<Self> {
        let state = SiteState::new(definition, args, Some(browser))?;
        Ok(Self { state: Arc::new(state) })
    }

    pub(crate) fn from_state(state: Arc<SiteState>) -> Self {
        Self { state }
    }

    pub fn base_url(&self) -> &str {
        &self.state.base_url
    }

    pub fn definition(&self) -> &Arc<SiteDefinition> {
        &self.state.definition
    }

    /// Site argument other than `base_url`
    pub fn init_arg(&self, name: &str) -> Option<&Value> {
        self.state.init_args.get(name)
    }

    /// Navigable page names in registration order
    pub fn page_names(&self) -> Vec<&str> {
        self.state.pages.iter().map(|p| p.name()).collect()
    }

    /// Compiled page by name
    pub fn descriptor(&self, name: &str) -> Result<Arc<PageDescriptor>> {
        PageResolver::new(&self.state).lookup(name)
    }

    /// Names declared by exactly one page
    pub fn unique_methods(&self) -> impl Iterator<Item = &str> {
        self.state.unique_methods.iter().map(String::as_str)
    }

    /// Page built or visited last
    pub fn most_recent_page(&self) -> Result<Option<PageInstance>> {
        self.state.most_recent()
    }

    /// Browser attached to the site
    pub fn browser(&self) -> Result<Browser> {
        self.state.browser()
    }

    /// Attach an already open browser, replacing any previous one.
    ///
    /// Pages built before keep driving the browser they were built on.
    pub fn attach_browser(&self, browser: Browser) -> Result<()> {
        self.state.set_browser(browser)?;
        self.state.forget_most_recent()
    }

    /// Open a browser on `platform` (`devtools` or `webdriver`) and attach it
    pub async fn open_browser(&self, platform: &str, browser_type: &str, options: BrowserOptions) -> Result<Browser> {
        let platform: Platform = platform.parse()?;
        let browser_type: BrowserType = browser_type.parse()?;
        info!("Opening {:?} browser on {:?}", browser_type, platform);

        let browser = driver::open(platform, browser_type, &options).await?;
        self.attach_browser(browser.clone())?;
        Ok(browser)
    }

    /// Open the browser described by a session configuration
    pub async fn open_configured_browser(&self, config: &SessionConfig) -> Result<Browser> {
        self.open_browser(&config.platform, &config.browser, config.browser_options())
            .await
    }

    /// Close the browser.
    ///
    /// The closed handle stays attached, so later calls on the site or on its
    /// pages fail with the driver's own error until another browser is attached.
    pub async fn close_browser(&self) -> Result<()> {
        let Some(browser) = self.state.attached_browser()? else {
            debug!("close_browser called without a browser");
            return Ok(());
        };
        if !browser.is_open()? {
            debug!("close_browser called on a closed browser");
            return Ok(());
        }
        self.state.forget_most_recent()?;
        info!("Closing browser");
        browser.close().await
    }

    /// Build the page registered as `name`, navigating to it when needed
    pub async fn get<A: Into<PageArgs>>(&self, name: &str, args: A) -> Result<PageInstance> {
        let descriptor = PageResolver::new(&self.state).lookup(name)?;
        PageInstance::load(&self.state, descriptor, args.into()).await
    }

    /// Whether the page registered as `name` is displayed, by URL shape alone
    pub async fn is_displayed(&self, name: &str) -> Result<bool> {
        self.on_page(name).await
    }

    /// Page the browser is showing, if any registered page matches
    pub async fn page(&self) -> Result<Option<PageInstance>> {
        PageResolver::new(&self.state).resolve().await
    }

    /// Current page, checked against `expected`
    pub async fn expect_page<R: Into<PageRef>>(&self, expected: R) -> Result<PageInstance> {
        let expected = expected.into();
        let current = self.page().await?.ok_or_else(|| {
            Error::wrong_page(format!("expected {} but no registered page is displayed", expected.name()))
        })?;

        if expected.accepts(&current) {
            Ok(current)
        } else {
            Err(Error::wrong_page(format!(
                "expected {} but {} is displayed ({})",
                expected.name(),
                current.name(),
                current.url()
            )))
        }
    }

    /// Whether the browser URL matches `page`, ignoring the most recent page
    pub async fn on_page<R: Into<PageRef>>(&self, page: R) -> Result<bool> {
        PageResolver::new(&self.state).on_page(&page.into()).await
    }

    /// Forward a call to the current page
    pub async fn forward(&self, name: &str, args: Vec<Value>) -> Result<Value> {
        router::forward(&self.state, name, args).await
    }
}

impl AsRef<Site> for Site {
    fn as_ref(&self) -> &Site {
        self
    }
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("base_url", &self.state.base_url)
            .field("pages", &self.page_names())
            .finish()
    }
}
