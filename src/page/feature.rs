//! Page features
//!
//! A feature is a reusable bundle of elements and methods (a header, a search
//! box) that several pages can use. Pages reach it through its accessor name.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::page::config::{boxed_method, PageMethod};
use crate::page::element::{Element, Locator};
use crate::page::instance::PageInstance;
use crate::{Error, Result};

/// Reusable bundle of elements and methods
#[derive(Clone)]
pub struct PageFeature {
    name: String,
    alias: Option<String>,
    elements: BTreeMap<String, Locator>,
    methods: BTreeMap<String, PageMethod>,
}

impl PageFeature {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            alias: None,
            elements: BTreeMap::new(),
            methods: BTreeMap::new(),
        }
    }

    /// Accessor name used on pages instead of the feature name
    pub fn alias<S: Into<String>>(mut self, alias: S) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn element<S: Into<String>>(mut self, name: S, locator: Locator) -> Self {
        self.elements.insert(name.into(), locator);
        self
    }

    pub fn method<S, F, Fut>(mut self, name: S, handler: F) -> Self
    where
        S: Into<String>,
        F: Fn(PageInstance, Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        self.methods.insert(name.into(), boxed_method(handler));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn accessor_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn element_names(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    pub(crate) fn method_fn(&self, name: &str) -> Option<&PageMethod> {
        self.methods.get(name)
    }

    pub(crate) fn locator(&self, name: &str) -> Option<&Locator> {
        self.elements.get(name)
    }
}

impl fmt::Debug for PageFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageFeature")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("elements", &self.elements)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A feature bound to a page instance
#[derive(Debug, Clone)]
pub struct FeatureInstance {
    feature: Arc<PageFeature>,
    page: String,
    page_url: String,
}

impl FeatureInstance {
    pub(crate) fn new(feature: Arc<PageFeature>, page: &str, page_url: &str) -> Self {
        Self {
            feature,
            page: page.to_string(),
            page_url: page_url.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        self.feature.name()
    }

    pub fn accessor_name(&self) -> &str {
        self.feature.accessor_name()
    }

    pub fn definition(&self) -> &PageFeature {
        &self.feature
    }

    /// Element declared by the feature
    pub fn element(&self, name: &str) -> Result<Element> {
        let locator = self.feature.locator(name).ok_or_else(|| {
            Error::no_such_method(format!("{}.{}", self.accessor_name(), name))
        })?;
        Ok(self.bind(name, locator))
    }

    /// All elements declared by the feature
    pub fn elements(&self) -> Vec<Element> {
        self.feature
            .elements
            .iter()
            .map(|(name, locator)| self.bind(name, locator))
            .collect()
    }

    fn bind(&self, name: &str, locator: &Locator) -> Element {
        Element {
            name: name.to_string(),
            locator: locator.clone(),
            page: self.page.clone(),
            page_url: self.page_url.clone(),
            feature: Some(self.name().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_box() -> PageFeature {
        PageFeature::new("search_box")
            .alias("search")
            .element("query", Locator::name("q"))
            .element("submit", Locator::css("button[type=submit]"))
    }

    #[test]
    fn test_accessor_name() {
        assert_eq!(search_box().accessor_name(), "search");
        assert_eq!(PageFeature::new("footer").accessor_name(), "footer");
    }

    #[test]
    fn test_bound_elements() {
        let instance = FeatureInstance::new(Arc::new(search_box()), "news", "https://example.org/news");

        let query = instance.element("query").unwrap();
        assert_eq!(query.locator, Locator::name("q"));
        assert_eq!(query.page, "news");
        assert_eq!(query.feature.as_deref(), Some("search_box"));

        let names: Vec<String> = instance.elements().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["query".to_string(), "submit".to_string()]);

        assert!(matches!(instance.element("missing").unwrap_err(), Error::NoSuchMethod(_)));
    }
}
