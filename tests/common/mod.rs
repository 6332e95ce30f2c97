//! Common test utilities
//!
//! Shared site definition and fixtures for the integration tests.

#![allow(dead_code)]

use page_oxide::driver::MockDriver;
use page_oxide::{page_accessors, Browser, Locator, PageConfig, PageFeature, Site, SiteDefinition};
use serde_json::{json, Value};
use std::sync::{Arc, Once};

pub const BASE_URL: &str = "https://blog.example.org";

static TRACING: Once = Once::new();

/// Install a test subscriber once per test binary; `RUST_LOG` controls output
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Pages of a small blog
pub fn blog_definition() -> SiteDefinition {
    let layout = PageConfig::new("layout")
        .attributes(["page_template"])
        .expect("valid attributes")
        .use_features(["navigation"])
        .element("footer", Locator::css("footer"));

    SiteDefinition::new()
        .feature(
            PageFeature::new("navigation")
                .alias("nav")
                .element("home_link", Locator::link_text("Home"))
                .method("menu", |_page, _args| async { Ok(json!(["home", "articles"])) }),
        )
        .page(layout.clone())
        .page(PageConfig::extend("home", &layout).url("/"))
        .page(
            PageConfig::extend("articles", &layout)
                .url("/{lang}/articles/")
                .method("count", |_page, args| async move {
                    Ok(json!(args.len()))
                }),
        )
        .page(
            PageConfig::extend("article", &layout)
                .url("/{lang}/articles/{slug}")
                .element("title", Locator::css("article h1"))
                .method("slug", |page, _args| async move {
                    Ok(Value::from(page.argument("slug").unwrap_or_default()))
                }),
        )
        .page(
            PageConfig::new("search")
                .url("/search?q={query}")
                .method("query", |page, _args| async move {
                    Ok(Value::from(page.argument("query").unwrap_or_default()))
                }),
        )
        .page(
            PageConfig::new("checkout")
                .url("/checkout")
                .attributes(["navigation_disabled"])
                .expect("valid attributes"),
        )
        .page(
            PageConfig::new("preview")
                .url("/preview")
                .url_matcher_pattern(r"^https://preview\.example\.org/")
                .expect("valid matcher")
                .method("publish", |_page, _args| async { Ok(json!("published")) }),
        )
}

/// Typed wrapper generated the way a test suite would
pub struct Blog {
    pub site: Site,
}

impl AsRef<Site> for Blog {
    fn as_ref(&self) -> &Site {
        &self.site
    }
}

page_accessors!(Blog {
    home / is_home,
    articles / is_articles,
    article / is_article,
    search / is_search,
    checkout / is_checkout,
});

/// A blog site driving a mock browser that shows `url`
pub fn open_blog(url: &str, args: Value) -> (Blog, Arc<MockDriver>) {
    init_tracing();

    let driver = Arc::new(MockDriver::new(url));
    let mut site_args = args;
    site_args["base_url"] = json!(BASE_URL);

    let site = Site::with_browser(Arc::new(blog_definition()), site_args, Browser::new(driver.clone()))
        .expect("Failed to create site");
    (Blog { site }, driver)
}
