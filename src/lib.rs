//! Page-Oxide: page objects for browser test automation
//!
//! Declare the pages of a site once (URL templates, elements, methods and
//! shared features) and let a `Site` build them, navigate to them, recognize
//! which one the browser is showing and forward calls to it.

pub mod config;
pub mod error;

pub mod driver;
pub mod page;
pub mod site;
pub mod template;

// Re-exports
pub use config::SessionConfig;
pub use driver::{Browser, BrowserDriver, BrowserOptions, BrowserType, DriverKind, Platform};
pub use error::{Error, Result};
pub use page::{
    ArgumentSource, Element, FeatureInstance, Locator, PageArgs, PageAttribute, PageConfig, PageDescriptor,
    PageFeature, PageInstance, PageLike,
};
pub use site::{PageRef, Site, SiteDefinition};
pub use template::{TemplateArgs, UrlTemplate};

/// Page-Oxide library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
