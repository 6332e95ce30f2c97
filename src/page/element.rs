//! Element locators

use serde::{Deserialize, Serialize};
use std::fmt;

/// How an element is found on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "using", content = "value", rename_all = "snake_case")]
pub enum Locator {
    Css(String),
    #[serde(rename = "xpath")]
    XPath(String),
    Id(String),
    Name(String),
    LinkText(String),
}

impl Locator {
    pub fn css<S: Into<String>>(selector: S) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath<S: Into<String>>(path: S) -> Self {
        Locator::XPath(path.into())
    }

    pub fn id<S: Into<String>>(id: S) -> Self {
        Locator::Id(id.into())
    }

    pub fn name<S: Into<String>>(name: S) -> Self {
        Locator::Name(name.into())
    }

    pub fn link_text<S: Into<String>>(text: S) -> Self {
        Locator::LinkText(text.into())
    }

    /// W3C WebDriver location strategy and value
    pub fn strategy(&self) -> (&'static str, String) {
        match self {
            Locator::Css(selector) => ("css selector", selector.clone()),
            Locator::XPath(path) => ("xpath", path.clone()),
            Locator::Id(id) => ("css selector", format!("[id=\"{}\"]", id)),
            Locator::Name(name) => ("css selector", format!("[name=\"{}\"]", name)),
            Locator::LinkText(text) => ("link text", text.clone()),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (using, value) = self.strategy();
        write!(f, "{}={}", using, value)
    }
}

/// An element declared on a page, bound to the page instance that owns it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    pub locator: Locator,
    /// Accessor name of the owning page
    pub page: String,
    /// URL the owning page instance was built for
    pub page_url: String,
    /// Feature that declared the element, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strategies() {
        assert_eq!(Locator::css("h1.title").strategy(), ("css selector", "h1.title".to_string()));
        assert_eq!(Locator::id("search").strategy(), ("css selector", "[id=\"search\"]".to_string()));
        assert_eq!(Locator::link_text("More").to_string(), "link text=More");
    }

    #[test]
    fn test_element_serialization() {
        let element = Element {
            name: "headline".to_string(),
            locator: Locator::xpath("//h1"),
            page: "news".to_string(),
            page_url: "https://example.org/en/news".to_string(),
            feature: None,
        };

        let value = serde_json::to_value(&element).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "headline",
                "locator": { "using": "xpath", "value": "//h1" },
                "page": "news",
                "page_url": "https://example.org/en/news",
            })
        );

        let back: Element = serde_json::from_value(value).unwrap();
        assert_eq!(back, element);
    }
}
