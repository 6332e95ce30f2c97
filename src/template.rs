//! URL templates
//!
//! A page declares its URL as a pattern that may contain `{name}` placeholders.
//! The compiled template expands concrete argument values into a navigation URL
//! and, in the other direction, recognizes an observed browser URL and recovers
//! the placeholder values from it.

use regex::Regex;
use std::collections::BTreeMap;

use crate::{Error, Result};

/// Placeholder values keyed by placeholder name
pub type TemplateArgs = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// Compiled URL template
#[derive(Debug, Clone)]
pub struct UrlTemplate {
    pattern: String,
    segments: Vec<Segment>,
    placeholders: Vec<String>,
    has_fragment: bool,
    has_query: bool,
    matcher: Regex,
}

impl UrlTemplate {
    /// Compile a page URL pattern against the site's base URL.
    ///
    /// Absolute patterns (`http://`, `https://`) ignore `base_url`; relative ones
    /// are appended to it verbatim. An empty or missing pattern compiles to the
    /// base URL alone.
    pub fn compile(pattern: Option<&str>, base_url: &str) -> Result<Self> {
        let full = match pattern.map(str::trim).filter(|p| !p.is_empty()) {
            None => base_url.to_string(),
            Some(p) if is_absolute(p) => p.to_string(),
            Some(p) => format!("{}{}", base_url, p),
        };
        Self::parse(full)
    }

    /// Parse an already complete pattern
    pub fn parse<S: Into<String>>(pattern: S) -> Result<Self> {
        let pattern = pattern.into();
        let segments = tokenize(&pattern)?;

        let mut placeholders: Vec<String> = Vec::new();
        let mut regex_source = String::from("^");
        for segment in &segments {
            match segment {
                Segment::Literal(text) => regex_source.push_str(&regex::escape(text)),
                Segment::Placeholder(name) => {
                    if placeholders.contains(name) {
                        return Err(Error::page_config(format!(
                            "placeholder '{{{}}}' appears more than once in URL template '{}'",
                            name, pattern
                        )));
                    }
                    placeholders.push(name.clone());
                    regex_source.push_str("([^/?#&]+)");
                }
            }
        }
        regex_source.push('$');

        let matcher = Regex::new(&regex_source).map_err(|e| {
            Error::page_config(format!("URL template '{}' cannot be matched: {}", pattern, e))
        })?;

        Ok(Self {
            has_fragment: pattern.contains('#'),
            has_query: pattern.contains('?'),
            pattern,
            segments,
            placeholders,
            matcher,
        })
    }

    /// Full pattern after base URL resolution
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Placeholder names in declaration order
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// True when the pattern has at least one placeholder
    pub fn is_templated(&self) -> bool {
        !self.placeholders.is_empty()
    }

    /// True when the pattern carries a `#fragment`
    pub fn has_fragment(&self) -> bool {
        self.has_fragment
    }

    /// True when the pattern carries a `?query`
    pub fn has_query(&self) -> bool {
        self.has_query
    }

    /// Substitute every placeholder with its percent-encoded value
    pub fn expand(&self, args: &TemplateArgs) -> Result<String> {
        let mut url = String::with_capacity(self.pattern.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => url.push_str(text),
                Segment::Placeholder(name) => {
                    let value = args.get(name).ok_or_else(|| {
                        Error::template_expansion(format!(
                            "no value for placeholder '{}' in '{}'",
                            name, self.pattern
                        ))
                    })?;
                    url.push_str(&urlencoding::encode(value));
                }
            }
        }
        Ok(url)
    }

    /// Strip the parts of an observed URL the template does not describe.
    ///
    /// The query string is dropped unless the template declares one; the
    /// fragment is dropped unless the template declares one.
    pub fn normalize(&self, observed: &str) -> String {
        let (before_fragment, fragment) = match observed.split_once('#') {
            Some((head, tail)) => (head, Some(tail)),
            None => (observed, None),
        };

        let mut normalized = if self.has_query {
            before_fragment.to_string()
        } else {
            before_fragment
                .split_once('?')
                .map(|(head, _)| head)
                .unwrap_or(before_fragment)
                .to_string()
        };

        if self.has_fragment {
            if let Some(fragment) = fragment {
                normalized.push('#');
                normalized.push_str(fragment);
            }
        }
        normalized
    }

    /// Whether the observed URL has this template's shape
    pub fn matches(&self, observed: &str) -> bool {
        self.matcher.is_match(&self.normalize(observed))
    }

    /// Recover placeholder values from an observed URL.
    ///
    /// Returns `None` when the URL does not match or a captured value is not
    /// valid percent-encoded UTF-8.
    pub fn extract(&self, observed: &str) -> Option<TemplateArgs> {
        let normalized = self.normalize(observed);
        let captures = self.matcher.captures(&normalized)?;

        let mut values = TemplateArgs::new();
        for (index, name) in self.placeholders.iter().enumerate() {
            let raw = captures.get(index + 1)?.as_str();
            let decoded = urlencoding::decode(raw).ok()?;
            values.insert(name.clone(), decoded.into_owned());
        }
        Some(values)
    }
}

fn is_absolute(pattern: &str) -> bool {
    let lower = pattern.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn tokenize(pattern: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == '}' {
                        closed = true;
                        break;
                    }
                    name.push(inner);
                }
                if !closed {
                    return Err(Error::page_config(format!(
                        "unterminated placeholder in URL template '{}'",
                        pattern
                    )));
                }
                if name.is_empty() || !name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
                    return Err(Error::page_config(format!(
                        "invalid placeholder '{{{}}}' in URL template '{}'",
                        name, pattern
                    )));
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder(name));
            }
            '}' => {
                return Err(Error::page_config(format!(
                    "unbalanced '}}' in URL template '{}'",
                    pattern
                )));
            }
            other => literal.push(other),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}
