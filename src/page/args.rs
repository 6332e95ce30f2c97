//! Page argument sources
//!
//! Values for a page's URL placeholders come from whatever the caller hands
//! to the page accessor. Maps, JSON values and custom types all answer the same
//! question: "what is the value for this name?"

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Anything that can supply placeholder values by name
pub trait ArgumentSource: Send + Sync {
    /// Value for `name`, if this source has one
    fn get(&self, name: &str) -> Option<String>;

    /// Short description used in error messages
    fn describe(&self) -> String {
        "argument source".to_string()
    }
}

/// String form of a JSON value used as a URL argument
pub fn arg_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl ArgumentSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }

    fn describe(&self) -> String {
        let mut keys: Vec<&str> = self.keys().map(String::as_str).collect();
        keys.sort_unstable();
        format!("map with keys [{}]", keys.join(", "))
    }
}

impl ArgumentSource for BTreeMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        BTreeMap::get(self, name).cloned()
    }

    fn describe(&self) -> String {
        let keys: Vec<&str> = self.keys().map(String::as_str).collect();
        format!("map with keys [{}]", keys.join(", "))
    }
}

impl ArgumentSource for serde_json::Map<String, Value> {
    fn get(&self, name: &str) -> Option<String> {
        serde_json::Map::get(self, name).and_then(arg_string)
    }

    fn describe(&self) -> String {
        let keys: Vec<&str> = self.keys().map(String::as_str).collect();
        format!("map with keys [{}]", keys.join(", "))
    }
}

/// Objects are looked up by key; any other value supplies nothing.
impl ArgumentSource for Value {
    fn get(&self, name: &str) -> Option<String> {
        match self {
            Value::Object(map) => ArgumentSource::get(map, name),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        match self {
            Value::Object(map) => map.describe(),
            other => format!("value {}", other),
        }
    }
}

/// Arguments supplied at a page accessor call site
#[derive(Default)]
pub enum PageArgs {
    /// Nothing supplied; required values come from the site's own arguments
    #[default]
    None,
    /// An explicit source
    Source(Box<dyn ArgumentSource>),
}

impl PageArgs {
    /// No arguments
    pub fn none() -> Self {
        PageArgs::None
    }

    /// Wrap any argument source
    pub fn from_source<S: ArgumentSource + 'static>(source: S) -> Self {
        PageArgs::Source(Box::new(source))
    }

    /// Build from name/value pairs
    pub fn pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: BTreeMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        PageArgs::from_source(map)
    }

    /// Whether anything was supplied
    pub fn is_supplied(&self) -> bool {
        matches!(self, PageArgs::Source(_))
    }

    /// Value for `name` from the supplied source
    pub fn get(&self, name: &str) -> Option<String> {
        match self {
            PageArgs::None => None,
            PageArgs::Source(source) => source.get(name),
        }
    }

    /// Description used in error messages
    pub fn describe(&self) -> String {
        match self {
            PageArgs::None => "no arguments".to_string(),
            PageArgs::Source(source) => source.describe(),
        }
    }
}

impl fmt::Debug for PageArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PageArgs({})", self.describe())
    }
}

impl From<Value> for PageArgs {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => PageArgs::None,
            other => PageArgs::from_source(other),
        }
    }
}

impl From<HashMap<String, String>> for PageArgs {
    fn from(map: HashMap<String, String>) -> Self {
        PageArgs::from_source(map)
    }
}

impl From<BTreeMap<String, String>> for PageArgs {
    fn from(map: BTreeMap<String, String>) -> Self {
        PageArgs::from_source(map)
    }
}

impl From<serde_json::Map<String, Value>> for PageArgs {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        PageArgs::from_source(map)
    }
}

impl<S: ArgumentSource + 'static> From<Option<S>> for PageArgs {
    fn from(source: Option<S>) -> Self {
        match source {
            Some(source) => PageArgs::from_source(source),
            None => PageArgs::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Article {
        slug: String,
    }

    impl ArgumentSource for Article {
        fn get(&self, name: &str) -> Option<String> {
            (name == "slug").then(|| self.slug.clone())
        }

        fn describe(&self) -> String {
            format!("article {}", self.slug)
        }
    }

    #[test]
    fn test_arg_string() {
        assert_eq!(arg_string(&json!("en")), Some("en".to_string()));
        assert_eq!(arg_string(&json!(42)), Some("42".to_string()));
        assert_eq!(arg_string(&json!(true)), Some("true".to_string()));
        assert_eq!(arg_string(&Value::Null), None);
    }

    #[test]
    fn test_json_sources() {
        let args = PageArgs::from(json!({ "lang": "en", "page": 2 }));
        assert!(args.is_supplied());
        assert_eq!(args.get("lang"), Some("en".to_string()));
        assert_eq!(args.get("page"), Some("2".to_string()));
        assert_eq!(args.get("missing"), None);

        let scalar = PageArgs::from(json!("just a string"));
        assert!(scalar.is_supplied());
        assert_eq!(scalar.get("lang"), None);
        assert_eq!(scalar.describe(), "value \"just a string\"");

        assert!(!PageArgs::from(Value::Null).is_supplied());
    }

    #[test]
    fn test_custom_source() {
        let args = PageArgs::from_source(Article { slug: "hello-world".into() });
        assert_eq!(args.get("slug"), Some("hello-world".to_string()));
        assert_eq!(args.get("lang"), None);
        assert_eq!(args.describe(), "article hello-world");
    }

    #[test]
    fn test_pairs_and_maps() {
        let args = PageArgs::pairs([("lang", "fr")]);
        assert_eq!(args.get("lang"), Some("fr".to_string()));

        let mut map = HashMap::new();
        map.insert("b".to_string(), "2".to_string());
        map.insert("a".to_string(), "1".to_string());
        let args = PageArgs::from(map);
        assert_eq!(args.describe(), "map with keys [a, b]");

        let none: Option<BTreeMap<String, String>> = None;
        assert!(!PageArgs::from(none).is_supplied());
    }
}
