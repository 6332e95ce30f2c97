//! Mock driver implementation for testing
//!
//! An in-memory browser: it remembers the current URL, records every navigation
//! and can be told that navigating to one URL lands on another.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::driver::traits::{BrowserDriver, DriverKind};
use crate::Error;

/// Mock browser driver
#[derive(Debug)]
pub struct MockDriver {
    id: String,
    kind: DriverKind,
    url: Arc<RwLock<String>>,
    navigations: Arc<RwLock<Vec<String>>>,
    redirects: Arc<RwLock<HashMap<String, String>>>,
    url_reads: AtomicUsize,
    refreshes: AtomicUsize,
    is_open: AtomicBool,
}

impl MockDriver {
    /// Create a new mock driver showing `url`
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: DriverKind::DevTools,
            url: Arc::new(RwLock::new(url.into())),
            navigations: Arc::new(RwLock::new(Vec::new())),
            redirects: Arc::new(RwLock::new(HashMap::new())),
            url_reads: AtomicUsize::new(0),
            refreshes: AtomicUsize::new(0),
            is_open: AtomicBool::new(true),
        }
    }

    /// Report a different driver kind
    pub fn with_kind(mut self, kind: DriverKind) -> Self {
        self.kind = kind;
        self
    }

    /// Driver ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Set URL (for testing)
    pub async fn set_url<S: Into<String>>(&self, url: S) {
        *self.url.write().await = url.into();
    }

    /// Make navigation to `from` land on `to`
    pub async fn redirect<S: Into<String>>(&self, from: S, to: S) {
        self.redirects.write().await.insert(from.into(), to.into());
    }

    /// URLs passed to `navigate`, in order
    pub async fn navigations(&self) -> Vec<String> {
        self.navigations.read().await.clone()
    }

    /// Number of `current_url` calls
    pub fn url_reads(&self) -> usize {
        self.url_reads.load(Ordering::SeqCst)
    }

    /// Number of `refresh` calls
    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<(), Error> {
        if self.is_open.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::cdp("Connection is closed"))
        }
    }
}

#[async_trait]
impl BrowserDriver for MockDriver {
    fn kind(&self) -> DriverKind {
        self.kind.clone()
    }

    async fn current_url(&self) -> Result<String, Error> {
        self.ensure_open()?;
        self.url_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.url.read().await.clone())
    }

    async fn navigate(&self, url: &str) -> Result<(), Error> {
        self.ensure_open()?;
        self.navigations.write().await.push(url.to_string());
        let landed = self
            .redirects
            .read()
            .await
            .get(url)
            .cloned()
            .unwrap_or_else(|| url.to_string());
        *self.url.write().await = landed;
        Ok(())
    }

    async fn refresh(&self) -> Result<(), Error> {
        self.ensure_open()?;
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.is_open.load(Ordering::SeqCst)
    }

    async fn close(&self) -> Result<(), Error> {
        self.is_open.store(false, Ordering::SeqCst);
        Ok(())
    }
}
