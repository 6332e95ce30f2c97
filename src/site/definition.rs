//! Site definitions

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::page::{PageConfig, PageFeature};

/// Every page and feature a site knows about, in registration order
#[derive(Debug, Default, Clone)]
pub struct SiteDefinition {
    pages: Vec<PageConfig>,
    features: BTreeMap<String, Arc<PageFeature>>,
    redefined_features: Vec<String>,
}

impl SiteDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page. Page templates are kept but never become navigable.
    pub fn page(mut self, config: PageConfig) -> Self {
        self.pages.push(config);
        self
    }

    /// Register a feature pages can use by name.
    ///
    /// A second feature with the same name is remembered and rejected by `Site::new`.
    pub fn feature(mut self, feature: PageFeature) -> Self {
        let name = feature.name().to_string();
        if self.features.contains_key(&name) {
            self.redefined_features.push(name);
        } else {
            self.features.insert(name, Arc::new(feature));
        }
        self
    }

    /// Every registered page, templates included
    pub fn pages(&self) -> &[PageConfig] {
        &self.pages
    }

    /// Registered page by name
    pub fn page_config(&self, name: &str) -> Option<&PageConfig> {
        self.pages.iter().find(|p| p.name() == name)
    }

    /// Pages that can be built and navigated to
    pub fn navigable_pages(&self) -> impl Iterator<Item = &PageConfig> {
        self.pages.iter().filter(|p| !p.is_page_template())
    }

    pub fn features(&self) -> &BTreeMap<String, Arc<PageFeature>> {
        &self.features
    }

    /// Feature names registered more than once
    pub fn redefined_features(&self) -> &[String] {
        &self.redefined_features
    }
}
