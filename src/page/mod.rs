//! # Page layer
//!
//! ## Module structure
//! - `config`: `PageConfig`, the author-facing page definition
//! - `descriptor`: `PageDescriptor`, a definition compiled for one site
//! - `instance`: `PageInstance`, a page bound to concrete arguments
//! - `args`: argument sources for templated pages
//! - `feature`: reusable bundles of elements and methods
//! - `element`: element locators

pub mod args;
pub mod config;
pub mod descriptor;
pub mod element;
pub mod feature;
pub mod instance;


pub use args::{ArgumentSource, PageArgs};
pub use config::{PageAttribute, PageConfig, PageMethod};
pub use descriptor::PageDescriptor;
pub use element::{Element, Locator};
pub use feature::{FeatureInstance, PageFeature};
pub use instance::{PageInstance, PageLike};
