//! Page instances
//!
//! A `PageInstance` is one page bound to concrete argument values and therefore
//! to one concrete URL. It shares the browser its site held when it was
//! built, so replacing or closing the site's browser never moves it.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, info};
use uuid::Uuid;

use crate::driver::Browser;
use crate::page::args::PageArgs;
use crate::page::descriptor::PageDescriptor;
use crate::page::element::Element;
use crate::page::feature::FeatureInstance;
use crate::site::{PageRef, Site, SiteState};
use crate::template::TemplateArgs;
use crate::{Error, Result};

/// Common surface of anything that behaves like a page
#[async_trait]
pub trait PageLike: Send + Sync {
    /// Accessor name of the page kind
    fn name(&self) -> &str;

    /// URL the page was built for
    fn url(&self) -> &str;

    /// Whether the browser currently shows this page
    async fn is_displayed(&self) -> Result<bool>;

    /// Whether `name` is a method, element or feature of the page
    fn responds_to(&self, name: &str) -> bool;

    /// Call a named method
    async fn invoke(&self, name: &str, args: Vec<Value>) -> Result<Value>;
}

struct PageInner {
    id: Uuid,
    descriptor: Arc<PageDescriptor>,
    site: Weak<SiteState>,
    browser: Browser,
    arguments: TemplateArgs,
    url: String,
    features: Vec<FeatureInstance>,
}

/// A page bound to concrete arguments
#[derive(Clone)]
pub struct PageInstance {
    inner: Arc<PageInner>,
}

impl PageInstance {
    /// Build a page for `descriptor`, navigating to it unless it is already shown
    pub(crate) async fn load(
        site: &Arc<SiteState>,
        descriptor: Arc<PageDescriptor>,
        args: PageArgs,
    ) -> Result<Self> {
        let browser = site.browser()?;
        let arguments = resolve_arguments(site, &descriptor, &args)?;
        let url = descriptor.template().expand(&arguments)?;
        let features = descriptor
            .features()
            .iter()
            .map(|feature| FeatureInstance::new(feature.clone(), descriptor.name(), &url))
            .collect();

        let page = Self {
            inner: Arc::new(PageInner {
                id: Uuid::new_v4(),
                descriptor,
                site: Arc::downgrade(site),
                browser,
                arguments,
                url,
                features,
            }),
        };
        debug!("Created page {} ({}) for {}", page.name(), page.id(), page.url());
        site.record(&page)?;

        if !page.is_displayed().await? {
            if page.inner.descriptor.navigation_disabled() {
                return Err(Error::navigation_not_allowed(format!(
                    "{} is not displayed and navigation is disabled for it",
                    page.name()
                )));
            }
            page.visit().await?;
        }
        Ok(page)
    }

    /// Unique identity of this instance
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        self.inner.descriptor.name()
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }

    pub fn descriptor(&self) -> &Arc<PageDescriptor> {
        &self.inner.descriptor
    }

    /// Resolved placeholder values
    pub fn arguments(&self) -> &TemplateArgs {
        &self.inner.arguments
    }

    pub fn argument(&self, name: &str) -> Option<&str> {
        self.inner.arguments.get(name).map(String::as_str)
    }

    /// Site that created this page
    pub fn site(&self) -> Result<Site> {
        self.site_state().map(Site::from_state)
    }

    fn site_state(&self) -> Result<Arc<SiteState>> {
        self.inner
            .site
            .upgrade()
            .ok_or_else(|| Error::internal(format!("the site of page {} has been dropped", self.name())))
    }

    /// Browser the page was built on
    pub fn browser(&self) -> &Browser {
        &self.inner.browser
    }

    /// Same instance
    pub fn is_same(&self, other: &PageInstance) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Same page kind with the same arguments
    pub fn is_equivalent(&self, other: &PageInstance) -> bool {
        Arc::ptr_eq(&self.inner.descriptor, &other.inner.descriptor)
            && self.inner.arguments == other.inner.arguments
    }

    /// Whether the browser currently shows this page.
    ///
    /// An override matcher decides alone, after the template's query and
    /// fragment normalization. Otherwise the URL must have the
    /// template's shape and, for templated pages, carry this page's values.
    pub async fn is_displayed(&self) -> Result<bool> {
        let observed = self.inner.browser.current_url().await?;
        Ok(self.shows(&observed))
    }

    pub(crate) fn shows(&self, observed: &str) -> bool {
        let descriptor = &self.inner.descriptor;
        if let Some(matcher) = descriptor.matcher() {
            return matcher.is_match(&descriptor.template().normalize(observed));
        }
        if descriptor.required_arguments().is_empty() {
            return descriptor.template().matches(observed);
        }
        match descriptor.template().extract(observed) {
            Some(found) => found == self.inner.arguments,
            None => false,
        }
    }

    /// Navigate to this page's URL and confirm the browser arrived
    pub async fn visit(&self) -> Result<PageInstance> {
        if self.inner.descriptor.navigation_disabled() {
            return Err(Error::navigation_not_allowed(format!(
                "navigation is disabled for {}",
                self.name()
            )));
        }

        let browser = &self.inner.browser;
        info!("Visiting {} at {}", self.name(), self.url());
        browser.navigate(self.url()).await?;

        if !self.is_displayed().await? {
            let observed = browser.current_url().await?;
            let expected = match self.inner.descriptor.matcher() {
                Some(matcher) => format!("a URL matching /{}/", matcher.as_str()),
                None => self.inner.descriptor.template().pattern().to_string(),
            };
            return Err(Error::wrong_page(format!(
                "expected {} at {} but the browser is at {}",
                self.name(),
                expected,
                observed
            )));
        }

        if let Some(site) = self.inner.site.upgrade() {
            site.record(self)?;
        }
        Ok(self.clone())
    }

    /// Reload the current document
    pub async fn refresh(&self) -> Result<PageInstance> {
        self.inner.browser.refresh().await?;
        Ok(self.clone())
    }

    /// Check that the browser is on `page`, returning the page it is on
    pub async fn expect_page<R: Into<PageRef>>(&self, page: R) -> Result<PageInstance> {
        self.site()?.expect_page(page).await
    }

    /// Element declared on the page
    pub fn element(&self, name: &str) -> Result<Element> {
        let locator = self
            .inner
            .descriptor
            .locator(name)
            .ok_or_else(|| Error::no_such_method(format!("{}.{}", self.name(), name)))?;
        Ok(Element {
            name: name.to_string(),
            locator: locator.clone(),
            page: self.name().to_string(),
            page_url: self.url().to_string(),
            feature: None,
        })
    }

    /// Feature by accessor name
    pub fn feature(&self, accessor: &str) -> Result<&FeatureInstance> {
        self.inner
            .features
            .iter()
            .find(|f| f.accessor_name() == accessor)
            .ok_or_else(|| Error::no_such_method(format!("{}.{}", self.name(), accessor)))
    }

    pub fn features(&self) -> &[FeatureInstance] {
        &self.inner.features
    }

    pub fn responds_to(&self, name: &str) -> bool {
        self.inner.descriptor.responds_to(name)
    }

    /// Call a page or feature method by name.
    ///
    /// Elements and features answer with their serialized form.
    pub async fn invoke(&self, name: &str, args: Vec<Value>) -> Result<Value> {
        if let Some(method) = self.inner.descriptor.method_fn(name) {
            debug!("Invoking {} on {}", name, self.name());
            return (**method)(self.clone(), args).await;
        }
        if self.inner.descriptor.locator(name).is_some() {
            return Ok(serde_json::to_value(self.element(name)?)?);
        }
        if let Ok(feature) = self.feature(name) {
            return Ok(serde_json::to_value(feature.elements())?);
        }
        Err(Error::no_such_method(format!("{}.{}", self.name(), name)))
    }
}

impl fmt::Debug for PageInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageInstance")
            .field("id", &self.inner.id)
            .field("name", &self.name())
            .field("url", &self.inner.url)
            .field("arguments", &self.inner.arguments)
            .finish()
    }
}

#[async_trait]
impl PageLike for PageInstance {
    fn name(&self) -> &str {
        PageInstance::name(self)
    }

    fn url(&self) -> &str {
        PageInstance::url(self)
    }

    async fn is_displayed(&self) -> Result<bool> {
        PageInstance::is_displayed(self).await
    }

    fn responds_to(&self, name: &str) -> bool {
        PageInstance::responds_to(self, name)
    }

    async fn invoke(&self, name: &str, args: Vec<Value>) -> Result<Value> {
        PageInstance::invoke(self, name, args).await
    }
}

/// Values for every placeholder: supplied source first, then the site's arguments
fn resolve_arguments(site: &SiteState, descriptor: &PageDescriptor, args: &PageArgs) -> Result<TemplateArgs> {
    let required = descriptor.required_arguments();
    if required.is_empty() {
        if args.is_supplied() {
            return Err(Error::page_init(format!(
                "{} takes no arguments but was given {}",
                descriptor.name(),
                args.describe()
            )));
        }
        return Ok(TemplateArgs::new());
    }

    let mut resolved = TemplateArgs::new();
    for name in required {
        let value = args.get(name).or_else(|| site.init_arg(name)).ok_or_else(|| {
            Error::page_init(format!(
                "{} requires [{}]; no value for '{}' in {} or the site arguments",
                descriptor.name(),
                required.join(", "),
                name,
                args.describe()
            ))
        })?;
        resolved.insert(name.clone(), value);
    }
    Ok(resolved)
}
