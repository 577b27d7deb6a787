//! Page source module
//!
//! A page source answers one request for one page index. It never caches
//! and never retries; every call is a single round trip.
//!
//! # Overview
//!
//! - `PageSource` - the trait the aggregator drives
//! - `HttpPageClient` - fetches `GET {base_url}{path}?{page_param}={n}`

mod http;

pub use http::{HttpPageClient, DEFAULT_PAGE_PARAM, DEFAULT_PATH};

use crate::error::Result;
use crate::types::Page;
use async_trait::async_trait;

/// Fetches single pages from an upstream source
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page with the given 1-based index
    ///
    /// Fails with `Error::InvalidPage` for index 0 and with
    /// `Error::Transport` for anything that goes wrong on the wire.
    async fn fetch_page(&self, page: u32) -> Result<Page>;
}
