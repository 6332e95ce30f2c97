//! Compiled page descriptors
//!
//! When a site is created every navigable page definition is compiled against
//! the site's base URL. The descriptor is what page instances and the resolver
//! share.

use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::page::config::{PageConfig, PageMethod};
use crate::page::element::Locator;
use crate::page::feature::PageFeature;
use crate::template::UrlTemplate;
use crate::{Error, Result};

/// A page definition compiled for one site
#[derive(Debug)]
pub struct PageDescriptor {
    config: PageConfig,
    template: UrlTemplate,
    features: Vec<Arc<PageFeature>>,
}

impl PageDescriptor {
    /// Compile `config` against `base_url`, resolving its features by name
    pub fn compile(
        config: &PageConfig,
        base_url: &str,
        registered: &BTreeMap<String, Arc<PageFeature>>,
    ) -> Result<Self> {
        let template = UrlTemplate::compile(config.url_pattern(), base_url)
            .map_err(|e| Error::page_config(format!("{}: {}", config.name(), e)))?;

        let features = config
            .features()
            .iter()
            .map(|name| {
                registered.get(name).cloned().ok_or_else(|| {
                    Error::page_config(format!("{}: unknown feature '{}'", config.name(), name))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            config: config.clone(),
            template,
            features,
        })
    }

    /// Accessor name
    pub fn name(&self) -> &str {
        self.config.name()
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn template(&self) -> &UrlTemplate {
        &self.template
    }

    pub fn matcher(&self) -> Option<&Regex> {
        self.config.matcher()
    }

    pub fn required_arguments(&self) -> &[String] {
        self.template.placeholders()
    }

    pub fn navigation_disabled(&self) -> bool {
        self.config.navigation_disabled()
    }

    pub fn features(&self) -> &[Arc<PageFeature>] {
        &self.features
    }

    /// Whether an observed URL looks like this page, ignoring argument values
    pub fn matches_url(&self, observed: &str) -> bool {
        match self.matcher() {
            Some(matcher) => matcher.is_match(&self.template.normalize(observed)),
            None => self.template.matches(observed),
        }
    }

    pub(crate) fn locator(&self, name: &str) -> Option<&Locator> {
        self.config.elements().get(name)
    }

    /// Page method or, failing that, the first feature method with this name
    pub(crate) fn method_fn(&self, name: &str) -> Option<&PageMethod> {
        self.config
            .methods()
            .get(name)
            .or_else(|| self.features.iter().find_map(|f| f.method_fn(name)))
    }

    /// Names a page instance answers to: methods, elements and feature accessors
    pub fn member_names(&self) -> BTreeSet<String> {
        let mut names: BTreeSet<String> = self
            .config
            .method_names()
            .chain(self.config.element_names())
            .map(str::to_string)
            .collect();
        for feature in &self.features {
            names.insert(feature.accessor_name().to_string());
            names.extend(feature.method_names().map(str::to_string));
        }
        names
    }

    pub fn responds_to(&self, name: &str) -> bool {
        self.config.methods().contains_key(name)
            || self.config.elements().contains_key(name)
            || self
                .features
                .iter()
                .any(|f| f.accessor_name() == name || f.method_fn(name).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn features() -> BTreeMap<String, Arc<PageFeature>> {
        let header = PageFeature::new("header")
            .element("logo", Locator::css("#logo"))
            .method("sign_out", |_page, _args| async { Ok(Value::Null) });
        let mut map = BTreeMap::new();
        map.insert("header".to_string(), Arc::new(header));
        map
    }

    #[test]
    fn test_compile_resolves_features() {
        let config = PageConfig::new("news")
            .url("{lang}/news")
            .use_features(["header"])
            .element("headline", Locator::css("h1"))
            .method("read_more", |_page, _args| async { Ok(Value::Null) });
        let descriptor = PageDescriptor::compile(&config, "https://example.org/", &features()).unwrap();

        assert_eq!(descriptor.name(), "news");
        assert_eq!(descriptor.template().pattern(), "https://example.org/{lang}/news");
        assert_eq!(descriptor.required_arguments(), &["lang".to_string()]);
        assert!(descriptor.responds_to("read_more"));
        assert!(descriptor.responds_to("headline"));
        assert!(descriptor.responds_to("header"));
        assert!(descriptor.responds_to("sign_out"));
        assert!(!descriptor.responds_to("logo"));

        let members: Vec<String> = descriptor.member_names().into_iter().collect();
        assert_eq!(members, vec!["header", "headline", "read_more", "sign_out"]);
    }

    #[test]
    fn test_unknown_feature() {
        let config = PageConfig::new("news").use_features(["sidebar"]);
        let err = PageDescriptor::compile(&config, "https://example.org/", &features()).unwrap_err();
        assert!(matches!(err, Error::PageConfig(ref msg) if msg.contains("sidebar")));
    }

    #[test]
    fn test_matcher_overrides_template() {
        let config = PageConfig::new("search")
            .url("search")
            .url_matcher(Regex::new(r"/find\b").unwrap());
        let descriptor = PageDescriptor::compile(&config, "https://example.org/", &features()).unwrap();

        assert!(descriptor.matches_url("https://example.org/find?q=rust"));
        assert!(!descriptor.matches_url("https://example.org/search"));
    }
}
