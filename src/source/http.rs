//! HTTP-backed page source

use super::PageSource;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::types::Page;
use async_trait::async_trait;
use tracing::debug;

/// Default path of the listings endpoint
pub const DEFAULT_PATH: &str = "/api/scrape";

/// Default name of the page query parameter
pub const DEFAULT_PAGE_PARAM: &str = "page";

/// Page source that requests pages from a JSON endpoint
#[derive(Debug)]
pub struct HttpPageClient {
    client: HttpClient,
    path: String,
    page_param: String,
}

impl HttpPageClient {
    /// Create a page client using the default endpoint path and parameter
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            path: DEFAULT_PATH.to_string(),
            page_param: DEFAULT_PAGE_PARAM.to_string(),
        }
    }

    /// Set the endpoint path
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the query parameter carrying the page index
    #[must_use]
    pub fn with_page_param(mut self, param: impl Into<String>) -> Self {
        self.page_param = param.into();
        self
    }

    /// Endpoint URL without the page parameter
    pub fn endpoint(&self) -> String {
        self.client.build_url(&self.path)
    }

    async fn request(&self, page: u32) -> Result<Page> {
        let config = RequestConfig::new().query(&self.page_param, page.to_string());
        self.client.get_json_with_config(&self.path, config).await
    }
}

#[async_trait]
impl PageSource for HttpPageClient {
    async fn fetch_page(&self, page: u32) -> Result<Page> {
        if page == 0 {
            return Err(Error::InvalidPage { page });
        }

        let result = self.request(page).await;
        match result {
            Ok(body) => {
                debug!(
                    page,
                    listings = body.listings.len(),
                    total_pages = ?body.total_pages,
                    "Fetched page"
                );
                Ok(body)
            }
            Err(e) => Err(Error::transport(page, e)),
        }
    }
}
