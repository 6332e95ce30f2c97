//! Shared site state
//!
//! Owned by `Site` handles and referenced weakly by the pages they create.

use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::driver::Browser;
use crate::page::args::arg_string;
use crate::page::{PageDescriptor, PageInstance};
use crate::site::definition::SiteDefinition;
use crate::site::router;
use crate::{Error, Result};

pub(crate) struct SiteState {
    pub(crate) definition: Arc<SiteDefinition>,
    pub(crate) base_url: String,
    pub(crate) init_args: serde_json::Map<String, Value>,
    pub(crate) pages: Vec<Arc<PageDescriptor>>,
    pub(crate) unique_methods: BTreeSet<String>,
    browser: RwLock<Option<Browser>>,
    most_recent: RwLock<Option<PageInstance>>,
}

impl SiteState {
    pub(crate) fn new(definition: Arc<SiteDefinition>, args: Value, browser: Option<Browser>) -> Result<Self> {
        let mut init_args = match args {
            Value::Object(map) => map,
            other => {
                return Err(Error::site_init(format!(
                    "site arguments must be an object, got {}",
                    other
                )))
            }
        };

        let base_url = match init_args.remove("base_url") {
            Some(Value::String(url)) if !url.trim().is_empty() => url,
            Some(other) => {
                return Err(Error::site_init(format!("base_url must be a non-empty string, got {}", other)))
            }
            None => return Err(Error::site_init("missing base_url")),
        };

        if let Some(name) = definition.redefined_features().first() {
            return Err(Error::page_config(format!("feature '{}' is registered twice", name)));
        }

        let mut pages: Vec<Arc<PageDescriptor>> = Vec::new();
        for config in definition.navigable_pages() {
            if pages.iter().any(|p| p.name() == config.name()) {
                return Err(Error::page_config(format!("page '{}' is registered twice", config.name())));
            }
            pages.push(Arc::new(PageDescriptor::compile(config, &base_url, definition.features())?));
        }
        let unique_methods = router::unique_members(&pages);
        debug!(
            "Site at {} compiled {} pages, {} unique page members",
            base_url,
            pages.len(),
            unique_methods.len()
        );

        Ok(Self {
            definition,
            base_url,
            init_args,
            pages,
            unique_methods,
            browser: RwLock::new(browser),
            most_recent: RwLock::new(None),
        })
    }

    pub(crate) fn descriptor(&self, name: &str) -> Option<&Arc<PageDescriptor>> {
        self.pages.iter().find(|p| p.name() == name)
    }

    /// Site argument as a placeholder value
    pub(crate) fn init_arg(&self, name: &str) -> Option<String> {
        self.init_args.get(name).and_then(arg_string)
    }

    pub(crate) fn attached_browser(&self) -> Result<Option<Browser>> {
        let browser = self
            .browser
            .read()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?;
        Ok(browser.clone())
    }

    pub(crate) fn browser(&self) -> Result<Browser> {
        self.attached_browser()?
            .ok_or_else(|| Error::browser_not_supported("no browser is attached to the site"))
    }

    pub(crate) fn set_browser(&self, browser: Browser) -> Result<Option<Browser>> {
        let mut slot = self
            .browser
            .write()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?;
        Ok(slot.replace(browser))
    }

    pub(crate) fn most_recent(&self) -> Result<Option<PageInstance>> {
        let page = self
            .most_recent
            .read()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?;
        Ok(page.clone())
    }

    pub(crate) fn record(&self, page: &PageInstance) -> Result<()> {
        let mut slot = self
            .most_recent
            .write()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?;
        *slot = Some(page.clone());
        Ok(())
    }

    pub(crate) fn forget_most_recent(&self) -> Result<()> {
        let mut slot = self
            .most_recent
            .write()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?;
        *slot = None;
        Ok(())
    }
}
