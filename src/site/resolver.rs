//! Current page resolution
//!
//! Works out which registered page the browser is showing. The most recent
//! page is asked first; otherwise the current URL is matched against every
//! navigable page, most specific kind of page first:
//!
//! 1. pages with an explicit URL matcher
//! 2. pages whose template contains a query string
//! 3. everything else
//!
//! Within each group pages keep their registration order.

use std::sync::Arc;
use tracing::debug;

use crate::page::{PageArgs, PageDescriptor, PageInstance};
use crate::site::state::SiteState;
use crate::template::TemplateArgs;
use crate::{Error, Result};

/// A page named by accessor name, by compiled descriptor, or by instance
#[derive(Debug, Clone)]
pub enum PageRef {
    Name(String),
    Descriptor(Arc<PageDescriptor>),
    Instance(PageInstance),
}

impl From<&str> for PageRef {
    fn from(name: &str) -> Self {
        PageRef::Name(name.to_string())
    }
}

impl From<String> for PageRef {
    fn from(name: String) -> Self {
        PageRef::Name(name)
    }
}

impl From<Arc<PageDescriptor>> for PageRef {
    fn from(descriptor: Arc<PageDescriptor>) -> Self {
        PageRef::Descriptor(descriptor)
    }
}

impl From<PageInstance> for PageRef {
    fn from(page: PageInstance) -> Self {
        PageRef::Instance(page)
    }
}

impl From<&PageInstance> for PageRef {
    fn from(page: &PageInstance) -> Self {
        PageRef::Instance(page.clone())
    }
}

impl PageRef {
    /// Accessor name of the referenced page kind
    pub fn name(&self) -> &str {
        match self {
            PageRef::Name(name) => name,
            PageRef::Descriptor(descriptor) => descriptor.name(),
            PageRef::Instance(page) => page.name(),
        }
    }

    /// Whether `page` is the referenced page.
    ///
    /// Instances match themselves or an equivalent instance.
    pub fn accepts(&self, page: &PageInstance) -> bool {
        match self {
            PageRef::Name(name) => page.name() == name,
            PageRef::Descriptor(descriptor) => Arc::ptr_eq(descriptor, page.descriptor()),
            PageRef::Instance(expected) => expected.is_same(page) || expected.is_equivalent(page),
        }
    }
}

pub(crate) struct PageResolver<'a> {
    state: &'a Arc<SiteState>,
}

impl<'a> PageResolver<'a> {
    pub(crate) fn new(state: &'a Arc<SiteState>) -> Self {
        Self { state }
    }

    /// Page currently displayed, if any registered page matches
    pub(crate) async fn resolve(&self) -> Result<Option<PageInstance>> {
        if let Some(recent) = self.state.most_recent()? {
            if recent.is_displayed().await? {
                debug!("Most recent page {} is still displayed", recent.name());
                return Ok(Some(recent));
            }
        }

        let observed = self.state.browser()?.current_url().await?;
        let Some((descriptor, extracted)) = self.identify(&observed) else {
            debug!("No registered page matches {}", observed);
            return Ok(None);
        };
        debug!("{} identified as {}", observed, descriptor.name());

        let args = match extracted {
            Some(values) if !descriptor.required_arguments().is_empty() => PageArgs::from(values),
            _ => PageArgs::None,
        };
        PageInstance::load(self.state, descriptor, args).await.map(Some)
    }

    /// First page matching `observed`, with the values its template extracts
    pub(crate) fn identify(&self, observed: &str) -> Option<(Arc<PageDescriptor>, Option<TemplateArgs>)> {
        self.candidates()
            .into_iter()
            .find(|d| d.matches_url(observed))
            .map(|d| {
                let extracted = d.template().extract(observed);
                (d, extracted)
            })
    }

    /// Navigable pages in matching order
    pub(crate) fn candidates(&self) -> Vec<Arc<PageDescriptor>> {
        let pages = &self.state.pages;
        let with_matcher = pages.iter().filter(|d| d.matcher().is_some());
        let with_query = pages
            .iter()
            .filter(|d| d.matcher().is_none() && d.template().has_query());
        let rest = pages
            .iter()
            .filter(|d| d.matcher().is_none() && !d.template().has_query());
        with_matcher.chain(with_query).chain(rest).cloned().collect()
    }

    /// Whether `page` matches the current URL, ignoring the most recent page
    pub(crate) async fn on_page(&self, page: &PageRef) -> Result<bool> {
        let observed = self.state.browser()?.current_url().await?;
        Ok(match page {
            PageRef::Instance(instance) => instance.shows(&observed),
            PageRef::Descriptor(descriptor) => descriptor.matches_url(&observed),
            PageRef::Name(name) => self.lookup(name)?.matches_url(&observed),
        })
    }

    pub(crate) fn lookup(&self, name: &str) -> Result<Arc<PageDescriptor>> {
        self.state
            .descriptor(name)
            .cloned()
            .ok_or_else(|| Error::unknown_page(name))
    }
}
