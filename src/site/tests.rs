//! Site tests
//!
//! Initialization, current page resolution, page expectations and call
//! forwarding against a mock browser.

use serde_json::{json, Value};
use std::sync::Arc;

use crate::driver::{Browser, BrowserDriver, BrowserOptions, MockDriver};
use crate::page::{Locator, PageArgs, PageAttribute, PageConfig, PageFeature};
use crate::site::{PageRef, Site, SiteDefinition};
use crate::Error;

const BASE: &str = "https://example.org";

fn definition() -> SiteDefinition {
    let base = PageConfig::new("base_page")
        .attribute(PageAttribute::PageTemplate)
        .use_features(["header"]);

    SiteDefinition::new()
        .feature(
            PageFeature::new("header")
                .element("logo", Locator::css("#logo"))
                .method("sign_out", |_page, _args| async { Ok(json!("signed out")) }),
        )
        .page(base.clone())
        .page(
            PageConfig::extend("news", &base)
                .url("/{lang}/news/")
                .method("headlines", |page, _args| async move {
                    Ok(json!([format!("{} headline", page.argument("lang").unwrap_or("?"))]))
                })
                .method("shared", |_page, _args| async { Ok(json!("news")) }),
        )
        .page(
            PageConfig::extend("results", &base)
                .url("/search?q={query}")
                .method("shared", |_page, _args| async { Ok(json!("results")) }),
        )
        .page(PageConfig::extend("search", &base).url("/search"))
        .page(
            PageConfig::new("legacy")
                .url("/legacy")
                .url_matcher_pattern(r"/old/")
                .expect("valid matcher")
                .method("archive", |_page, _args| async { Ok(json!("archived")) }),
        )
}

fn site_at(url: &str) -> (Site, Arc<MockDriver>) {
    let driver = Arc::new(MockDriver::new(url));
    let site = Site::with_browser(
        Arc::new(definition()),
        json!({ "base_url": BASE, "lang": "en" }),
        Browser::new(driver.clone()),
    )
    .expect("Failed to create site");
    (site, driver)
}

#[test]
fn test_site_initialization() {
    let site = Site::new(Arc::new(definition()), json!({ "base_url": BASE, "lang": "en" })).unwrap();

    assert_eq!(site.base_url(), BASE);
    assert_eq!(site.init_arg("lang"), Some(&json!("en")));
    assert!(site.init_arg("base_url").is_none());
    assert_eq!(site.page_names(), vec!["news", "results", "search", "legacy"]);
    assert!(matches!(site.descriptor("base_page").unwrap_err(), Error::UnknownPage(_)));
    assert!(matches!(site.browser().unwrap_err(), Error::BrowserLibraryNotSupported(_)));
}

#[test]
fn test_site_initialization_errors() {
    let definition = Arc::new(definition());

    let err = Site::new(definition.clone(), json!(["https://example.org"])).unwrap_err();
    assert!(matches!(err, Error::SiteInit(_)));

    let err = Site::new(definition.clone(), json!({ "lang": "en" })).unwrap_err();
    assert!(matches!(err, Error::SiteInit(ref msg) if msg.contains("base_url")));

    let err = Site::new(definition, json!({ "base_url": 42 })).unwrap_err();
    assert!(matches!(err, Error::SiteInit(_)));

    let duplicated = SiteDefinition::new()
        .page(PageConfig::new("home"))
        .page(PageConfig::new("home").url("/home"));
    let err = Site::new(Arc::new(duplicated), json!({ "base_url": BASE })).unwrap_err();
    assert!(matches!(err, Error::PageConfig(ref msg) if msg.contains("home")));

    let features = SiteDefinition::new()
        .feature(PageFeature::new("header"))
        .feature(PageFeature::new("header").element("logo", Locator::css("#logo")))
        .page(PageConfig::new("home").use_features(["header"]));
    let err = Site::new(Arc::new(features), json!({ "base_url": BASE })).unwrap_err();
    assert!(matches!(err, Error::PageConfig(ref msg) if msg.contains("feature 'header'")));

    let broken = SiteDefinition::new().page(PageConfig::new("home").url("/{lang"));
    let err = Site::new(Arc::new(broken), json!({ "base_url": BASE })).unwrap_err();
    assert!(matches!(err, Error::PageConfig(_)));
}

#[test]
fn test_unique_methods() {
    let site = Site::new(Arc::new(definition()), json!({ "base_url": BASE })).unwrap();
    let unique: Vec<&str> = site.unique_methods().collect();

    assert_eq!(unique, vec!["archive", "headlines"]);
}

#[tokio::test]
async fn test_page_resolution_from_url() {
    let (site, driver) = site_at("https://example.org/fr/news/");

    let page = site.page().await.unwrap().expect("news should be displayed");
    assert_eq!(page.name(), "news");
    assert_eq!(page.argument("lang"), Some("fr"));
    assert!(driver.navigations().await.is_empty());

    driver.set_url("https://example.org/unknown").await;
    assert!(site.page().await.unwrap().is_none());
}

#[tokio::test]
async fn test_query_templates_win() {
    let (site, driver) = site_at("https://example.org/search?q=rust%20lang");

    let page = site.page().await.unwrap().unwrap();
    assert_eq!(page.name(), "results");
    assert_eq!(page.argument("query"), Some("rust lang"));

    driver.set_url("https://example.org/search").await;
    assert_eq!(site.page().await.unwrap().unwrap().name(), "search");
}

#[tokio::test]
async fn test_matcher_pages_win() {
    let (site, _driver) = site_at("https://example.org/old/en/news/");

    let page = site.page().await.unwrap().unwrap();
    assert_eq!(page.name(), "legacy");
}

#[tokio::test]
async fn test_most_recent_page_fast_path() {
    let (site, driver) = site_at("about:blank");

    let news = site.get("news", PageArgs::None).await.unwrap();
    let current = site.page().await.unwrap().unwrap();
    assert!(current.is_same(&news));

    driver.set_url("https://example.org/search").await;
    let current = site.page().await.unwrap().unwrap();
    assert_eq!(current.name(), "search");
    assert!(site.most_recent_page().unwrap().unwrap().is_same(&current));
}

#[tokio::test]
async fn test_expect_page() {
    let (site, driver) = site_at("about:blank");
    let news = site.get("news", json!({ "lang": "de" })).await.unwrap();
    let descriptor = site.descriptor("news").unwrap();

    assert!(site.expect_page("news").await.unwrap().is_same(&news));
    assert!(site.expect_page(descriptor.clone()).await.unwrap().is_same(&news));
    assert!(site.expect_page(&news).await.unwrap().is_same(&news));
    assert!(news.expect_page("news").await.unwrap().is_same(&news));

    driver.set_url("https://example.org/search").await;
    for expected in [PageRef::from("news"), PageRef::from(descriptor), PageRef::from(&news)] {
        let err = site.expect_page(expected).await.unwrap_err();
        assert!(matches!(err, Error::WrongPage(ref msg) if msg.contains("search")));
    }

    driver.set_url("https://example.org/nowhere").await;
    let err = site.expect_page("news").await.unwrap_err();
    assert!(matches!(err, Error::WrongPage(_)));
}

#[tokio::test]
async fn test_expect_page_accepts_equivalent_instance() {
    let (site, driver) = site_at("about:blank");
    let news = site.get("news", PageArgs::None).await.unwrap();

    // a fresh instance for the same URL, built by the resolver
    driver.set_url("https://example.org/search").await;
    site.page().await.unwrap();
    driver.set_url("https://example.org/en/news/").await;

    let current = site.expect_page(&news).await.unwrap();
    assert!(!current.is_same(&news));
    assert!(current.is_equivalent(&news));
}

#[tokio::test]
async fn test_on_page_ignores_most_recent() {
    let (site, driver) = site_at("about:blank");
    let news = site.get("news", PageArgs::None).await.unwrap();

    assert!(site.on_page("news").await.unwrap());
    assert!(site.on_page(&news).await.unwrap());
    assert!(site.is_displayed("news").await.unwrap());
    assert!(!site.is_displayed("search").await.unwrap());

    driver.set_url("https://example.org/fr/news/").await;
    assert!(site.on_page("news").await.unwrap());
    assert!(!site.on_page(&news).await.unwrap());

    assert!(matches!(site.is_displayed("base_page").await.unwrap_err(), Error::UnknownPage(_)));
}

#[tokio::test]
async fn test_forward_fast_path() {
    let (site, driver) = site_at("about:blank");
    site.get("news", PageArgs::None).await.unwrap();

    let reads = driver.url_reads();
    let value = site.forward("headlines", vec![]).await.unwrap();
    assert_eq!(value, json!(["en headline"]));
    assert_eq!(driver.url_reads(), reads);
}

#[tokio::test]
async fn test_forward_resolves_current_page() {
    let (site, driver) = site_at("about:blank");
    site.get("news", PageArgs::None).await.unwrap();

    // not unique: resolved against the browser
    driver.set_url("https://example.org/search?q=rust").await;
    assert_eq!(site.forward("shared", vec![]).await.unwrap(), json!("results"));

    // feature methods are shared by every page
    assert_eq!(site.forward("sign_out", vec![]).await.unwrap(), json!("signed out"));

    let err = site.forward("publish", vec![Value::Null]).await.unwrap_err();
    assert!(matches!(err, Error::NoSuchMethod(ref name) if name == "publish"));

    driver.set_url("https://example.org/nowhere").await;
    let err = site.forward("shared", vec![]).await.unwrap_err();
    assert!(matches!(err, Error::NoSuchMethod(_)));
}

#[tokio::test]
async fn test_browser_lifecycle() {
    let (site, driver) = site_at("about:blank");
    site.get("news", PageArgs::None).await.unwrap();

    site.close_browser().await.unwrap();
    assert!(!driver.is_open());
    assert!(site.most_recent_page().unwrap().is_none());
    assert!(matches!(site.page().await.unwrap_err(), Error::Cdp(_)));

    // closing twice is a no-op
    site.close_browser().await.unwrap();

    let replacement = Arc::new(MockDriver::new("https://example.org/search"));
    site.attach_browser(Browser::new(replacement)).unwrap();
    assert_eq!(site.page().await.unwrap().unwrap().name(), "search");
}

#[tokio::test]
async fn test_pages_fail_through_driver_after_close() {
    let (site, driver) = site_at("about:blank");
    let news = site.get("news", PageArgs::None).await.unwrap();

    site.close_browser().await.unwrap();
    assert!(matches!(news.is_displayed().await.unwrap_err(), Error::Cdp(_)));
    assert!(matches!(news.visit().await.unwrap_err(), Error::Cdp(_)));
    assert!(matches!(news.refresh().await.unwrap_err(), Error::Cdp(_)));
    assert_eq!(driver.navigations().await.len(), 1);
}

#[tokio::test]
async fn test_pages_keep_their_browser() {
    let (site, first) = site_at("about:blank");
    let news = site.get("news", PageArgs::None).await.unwrap();

    let second = Arc::new(MockDriver::new("about:blank"));
    site.attach_browser(Browser::new(second.clone())).unwrap();
    assert!(news.browser().same_driver(&Browser::new(first.clone())));

    news.visit().await.unwrap();
    assert_eq!(first.navigations().await.len(), 2);
    assert!(second.navigations().await.is_empty());

    let replacement = site.get("news", PageArgs::None).await.unwrap();
    assert!(!replacement.browser().same_driver(news.browser()));
    assert_eq!(second.navigations().await, vec!["https://example.org/en/news/".to_string()]);
}

#[tokio::test]
async fn test_open_browser_rejects_unknown_platform() {
    let site = Site::new(Arc::new(definition()), json!({ "base_url": BASE })).unwrap();

    let err = site.open_browser("watir", "chrome", BrowserOptions::default()).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));

    let err = site.open_browser("devtools", "netscape", BrowserOptions::default()).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

struct Newsroom {
    site: Site,
}

impl AsRef<Site> for Newsroom {
    fn as_ref(&self) -> &Site {
        &self.site
    }
}

crate::page_accessors!(Newsroom {
    news / is_news,
    search / is_search,
});

#[tokio::test]
async fn test_generated_accessors() {
    let (site, driver) = site_at("about:blank");
    let newsroom = Newsroom { site };

    let news = newsroom.news(json!({ "lang": "it" })).await.unwrap();
    assert_eq!(news.url(), "https://example.org/it/news/");
    assert!(newsroom.is_news().await.unwrap());
    assert!(!newsroom.is_search().await.unwrap());

    newsroom.search(PageArgs::None).await.unwrap();
    assert_eq!(
        driver.navigations().await,
        vec!["https://example.org/it/news/".to_string(), "https://example.org/search".to_string()]
    );
}
