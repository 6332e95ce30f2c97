//! Page definitions
//!
//! A `PageConfig` is the author-facing description of one kind of page: its URL
//! pattern, an optional matcher overriding the pattern for recognition, the
//! attributes `navigation_disabled` and `page_template`, features, elements and
//! named methods. Configs are assembled with a builder and registered on a
//! `SiteDefinition`.

use futures::future::BoxFuture;
use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use crate::page::element::Locator;
use crate::page::instance::PageInstance;
use crate::template::UrlTemplate;
use crate::{Error, Result};

/// A named method callable on a page instance
pub type PageMethod =
    Arc<dyn Fn(PageInstance, Vec<Value>) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

pub(crate) fn boxed_method<F, Fut>(handler: F) -> PageMethod
where
    F: Fn(PageInstance, Vec<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    Arc::new(
        move |page: PageInstance, args: Vec<Value>| -> BoxFuture<'static, Result<Value>> {
            Box::pin(handler(page, args))
        },
    )
}

/// Page attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PageAttribute {
    /// The page is never navigated to directly
    NavigationDisabled,
    /// The page only serves as a base for other pages
    PageTemplate,
}

impl PageAttribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageAttribute::NavigationDisabled => "navigation_disabled",
            PageAttribute::PageTemplate => "page_template",
        }
    }
}

impl fmt::Display for PageAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageAttribute {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "navigation_disabled" => Ok(PageAttribute::NavigationDisabled),
            "page_template" => Ok(PageAttribute::PageTemplate),
            other => Err(Error::page_config(format!("unknown page attribute '{}'", other))),
        }
    }
}

/// Definition of one kind of page
#[derive(Clone)]
pub struct PageConfig {
    name: String,
    url: Option<String>,
    url_matcher: Option<Regex>,
    attributes: BTreeSet<PageAttribute>,
    features: Vec<String>,
    elements: BTreeMap<String, Locator>,
    methods: BTreeMap<String, PageMethod>,
}

impl PageConfig {
    /// New page definition; `name` is the accessor name on the site
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            url: None,
            url_matcher: None,
            attributes: BTreeSet::new(),
            features: Vec::new(),
            elements: BTreeMap::new(),
            methods: BTreeMap::new(),
        }
    }

    /// New page definition starting from everything `template` declares.
    ///
    /// Features accumulate: features used by the new page are appended to the
    /// template's. The `page_template` attribute itself is not inherited.
    pub fn extend<S: Into<String>>(name: S, template: &PageConfig) -> Self {
        let mut config = template.clone();
        config.name = name.into();
        config.attributes.remove(&PageAttribute::PageTemplate);
        config
    }

    /// URL pattern, absolute or relative to the site's base URL
    pub fn url<S: Into<String>>(mut self, pattern: S) -> Self {
        let pattern = pattern.into();
        self.url = if pattern.trim().is_empty() { None } else { Some(pattern) };
        self
    }

    /// Matcher overriding the URL pattern when recognizing the page
    pub fn url_matcher(mut self, matcher: Regex) -> Self {
        self.url_matcher = Some(matcher);
        self
    }

    /// Matcher from a regular expression source
    pub fn url_matcher_pattern(self, pattern: &str) -> Result<Self> {
        let matcher = Regex::new(pattern).map_err(|e| {
            Error::page_config(format!(
                "{}: url matcher '{}' is not a regular expression: {}",
                self.name, pattern, e
            ))
        })?;
        Ok(self.url_matcher(matcher))
    }

    /// Set attributes by name
    pub fn attributes<I, S>(mut self, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref();
            let attribute = name.parse::<PageAttribute>().map_err(|_| {
                Error::page_config(format!(
                    "{}: unsupported page attribute '{}', expected navigation_disabled or page_template",
                    self.name, name
                ))
            })?;
            self.attributes.insert(attribute);
        }
        Ok(self)
    }

    /// Set one attribute
    pub fn attribute(mut self, attribute: PageAttribute) -> Self {
        self.attributes.insert(attribute);
        self
    }

    /// Use registered features by name
    pub fn use_features<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.features.contains(&name) {
                self.features.push(name);
            }
        }
        self
    }

    /// Declare an element
    pub fn element<S: Into<String>>(mut self, name: S, locator: Locator) -> Self {
        self.elements.insert(name.into(), locator);
        self
    }

    /// Declare a method
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

    pub fn url_pattern(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn matcher(&self) -> Option<&Regex> {
        self.url_matcher.as_ref()
    }

    pub fn has_attribute(&self, attribute: PageAttribute) -> bool {
        self.attributes.contains(&attribute)
    }

    pub fn is_page_template(&self) -> bool {
        self.has_attribute(PageAttribute::PageTemplate)
    }

    pub fn navigation_disabled(&self) -> bool {
        self.has_attribute(PageAttribute::NavigationDisabled)
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn element_names(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    pub(crate) fn elements(&self) -> &BTreeMap<String, Locator> {
        &self.elements
    }

    pub(crate) fn methods(&self) -> &BTreeMap<String, PageMethod> {
        &self.methods
    }

    /// Placeholder names of the URL pattern compiled against `base_url`, in order
    pub fn required_arguments(&self, base_url: &str) -> Result<Vec<String>> {
        let template = UrlTemplate::compile(self.url_pattern(), base_url)?;
        Ok(template.placeholders().to_vec())
    }
}

impl fmt::Debug for PageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageConfig")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("url_matcher", &self.url_matcher.as_ref().map(Regex::as_str))
            .field("attributes", &self.attributes)
            .field("features", &self.features)
            .field("elements", &self.elements)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_parsing() {
        let config = PageConfig::new("login")
            .attributes(["navigation_disabled"])
            .unwrap();
        assert!(config.navigation_disabled());
        assert!(!config.is_page_template());

        let err = PageConfig::new("login").attributes(["sticky"]).unwrap_err();
        match err {
            Error::PageConfig(msg) => {
                assert!(msg.contains("login"));
                assert!(msg.contains("sticky"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_matcher_pattern_validation() {
        let config = PageConfig::new("search").url_matcher_pattern(r"/search\?").unwrap();
        assert!(config.matcher().unwrap().is_match("https://example.org/search?q=x"));

        let err = PageConfig::new("search").url_matcher_pattern("(unclosed").unwrap_err();
        assert!(matches!(err, Error::PageConfig(_)));
    }

    #[test]
    fn test_empty_url_is_unset() {
        let config = PageConfig::new("home").url("  ");
        assert_eq!(config.url_pattern(), None);
        assert!(config.required_arguments("https://example.org/").unwrap().is_empty());
    }

    #[test]
    fn test_required_arguments_order() {
        let config = PageConfig::new("article").url("{lang}/articles/{slug}");
        assert_eq!(
            config.required_arguments("https://example.org/").unwrap(),
            vec!["lang".to_string(), "slug".to_string()]
        );
    }

    #[test]
    fn test_extend_copies_template() {
        let base = PageConfig::new("base")
            .attribute(PageAttribute::PageTemplate)
            .attribute(PageAttribute::NavigationDisabled)
            .use_features(["header"])
            .element("logo", Locator::css("#logo"))
            .method("title", |_page, _args| async { Ok(Value::from("base")) });
        assert!(base.is_page_template());

        let news = PageConfig::extend("news", &base)
            .url("news")
            .use_features(["footer", "header"])
            .element("headline", Locator::css("h1"));

        assert_eq!(news.name(), "news");
        assert!(!news.is_page_template());
        assert!(news.navigation_disabled());
        assert_eq!(news.features(), &["header".to_string(), "footer".to_string()]);
        assert_eq!(news.element_names().collect::<Vec<_>>(), vec!["headline", "logo"]);
        assert_eq!(news.method_names().collect::<Vec<_>>(), vec!["title"]);

        // the template is untouched
        assert_eq!(base.element_names().count(), 1);
        assert_eq!(base.features().len(), 1);
    }
}
