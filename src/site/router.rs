//! Forwarding unknown site calls to pages
//!
//! A call the site itself does not answer goes to a page. Names that exactly
//! one page declares skip page resolution when the most recent page has them,
//! which saves a round trip to the browser for the common case of calling a
//! page method right after getting the page.

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

use crate::page::{PageDescriptor, PageLike};
use crate::site::resolver::PageResolver;
use crate::site::state::SiteState;
use crate::{Error, Result};

/// Member names declared by exactly one page
pub(crate) fn unique_members(pages: &[Arc<PageDescriptor>]) -> BTreeSet<String> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for page in pages {
        for name in page.member_names() {
            *counts.entry(name).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count == 1)
        .map(|(name, _)| name)
        .collect()
}

pub(crate) async fn forward(state: &Arc<SiteState>, name: &str, args: Vec<Value>) -> Result<Value> {
    if state.unique_methods.contains(name) {
        if let Some(recent) = state.most_recent()? {
            if recent.responds_to(name) {
                debug!("Forwarding {} to most recent page {}", name, recent.name());
                return dispatch(&recent, name, args).await;
            }
        }
    }

    match PageResolver::new(state).resolve().await? {
        Some(page) if page.responds_to(name) => {
            debug!("Forwarding {} to current page {}", name, page.name());
            dispatch(&page, name, args).await
        }
        _ => Err(Error::no_such_method(name)),
    }
}

async fn dispatch(page: &dyn PageLike, name: &str, args: Vec<Value>) -> Result<Value> {
    page.invoke(name, args).await
}
