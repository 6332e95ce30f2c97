//! Unified error types for Page-Oxide

use thiserror::Error;

/// Unified Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Page-Oxide
#[derive(Error, Debug)]
pub enum Error {
    /// Site constructed with unusable arguments
    #[error("Site initialization error: {0}")]
    SiteInit(String),

    /// Invalid page declaration (attribute, matcher, template, feature)
    #[error("Page configuration error: {0}")]
    PageConfig(String),

    /// Page arguments could not be resolved, or were supplied to a page that takes none
    #[error("Page initialization error: {0}")]
    PageInit(String),

    /// Navigation attempted on a page declared with `navigation_disabled`
    #[error("Navigation not allowed: {0}")]
    PageNavigationNotAllowed(String),

    /// The browser is not on the page that was expected
    #[error("Wrong page: {0}")]
    WrongPage(String),

    /// Missing browser handle or an unsupported driver kind
    #[error("Browser library not supported: {0}")]
    BrowserLibraryNotSupported(String),

    /// Template expansion with a missing placeholder value
    #[error("Template expansion error: {0}")]
    TemplateExpansion(String),

    /// Neither the page nor the site responds to a call
    #[error("undefined method `{0}`")]
    NoSuchMethod(String),

    /// Page name not registered as a navigable page
    #[error("Unknown page: {0}")]
    UnknownPage(String),

    /// Invalid argument passed to a site or browser operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// WebSocket errors
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// CDP protocol errors
    #[error("CDP error: {0}")]
    Cdp(String),

    /// W3C WebDriver protocol errors
    #[error("WebDriver error: {0}")]
    WebDriver(String),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Timeout
    #[error("Operation timeout: {0}")]
    Timeout(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new site initialization error
    pub fn site_init<S: Into<String>>(msg: S) -> Self {
        Error::SiteInit(msg.into())
    }

    /// Create a new page configuration error
    pub fn page_config<S: Into<String>>(msg: S) -> Self {
        Error::PageConfig(msg.into())
    }

    /// Create a new page initialization error
    pub fn page_init<S: Into<String>>(msg: S) -> Self {
        Error::PageInit(msg.into())
    }

    /// Create a new navigation not allowed error
    pub fn navigation_not_allowed<S: Into<String>>(msg: S) -> Self {
        Error::PageNavigationNotAllowed(msg.into())
    }

    /// Create a new wrong page error
    pub fn wrong_page<S: Into<String>>(msg: S) -> Self {
        Error::WrongPage(msg.into())
    }

    /// Create a new unsupported browser library error
    pub fn browser_not_supported<S: Into<String>>(msg: S) -> Self {
        Error::BrowserLibraryNotSupported(msg.into())
    }

    /// Create a new template expansion error
    pub fn template_expansion<S: Into<String>>(msg: S) -> Self {
        Error::TemplateExpansion(msg.into())
    }

    /// Create a new undefined method error
    pub fn no_such_method<S: Into<String>>(name: S) -> Self {
        Error::NoSuchMethod(name.into())
    }

    /// Create a new unknown page error
    pub fn unknown_page<S: Into<String>>(name: S) -> Self {
        Error::UnknownPage(name.into())
    }

    /// Create a new invalid argument error
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Create a new WebSocket error
    pub fn websocket<S: Into<String>>(msg: S) -> Self {
        Error::WebSocket(msg.into())
    }

    /// Create a new CDP error
    pub fn cdp<S: Into<String>>(msg: S) -> Self {
        Error::Cdp(msg.into())
    }

    /// Create a new WebDriver error
    pub fn webdriver<S: Into<String>>(msg: S) -> Self {
        Error::WebDriver(msg.into())
    }

    /// Create a new HTTP error
    pub fn http<S: Into<String>>(msg: S) -> Self {
        Error::Http(msg.into())
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        Error::Timeout(msg.into())
    }

    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout(err.to_string())
        } else {
            Error::Http(err.to_string())
        }
    }
}
