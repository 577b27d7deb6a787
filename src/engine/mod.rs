//! Execution engine module
//!
//! The pagination aggregator: requests pages one after another, appends
//! their listings and stops on an empty page, on the reported last page,
//! or on the first error.
//!
//! # Overview
//!
//! - `Aggregator` - drives a `PageSource` through one run at a time
//! - `AggregationState` - the listings, status and error of a run
//! - `FetchContext` - explicit per-run parameters

mod types;

pub use types::{AggregationState, AggregationStatus, AggregatorConfig, FetchContext};

use crate::error::{Error, Result};
use crate::pagination::{PageCursor, StopResult};
use crate::source::PageSource;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Aggregates every page of a source into one collection
pub struct Aggregator {
    /// Page source
    source: Arc<dyn PageSource>,
    /// Aggregator configuration
    config: AggregatorConfig,
    /// Held for the duration of a run
    running: Mutex<()>,
}

impl Aggregator {
    /// Create a new aggregator
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self {
            source,
            config: AggregatorConfig::default(),
            running: Mutex::new(()),
        }
    }

    /// Set aggregator configuration
    #[must_use]
    pub fn with_config(mut self, config: AggregatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the aggregator configuration
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Check if a run is in progress
    pub fn is_running(&self) -> bool {
        self.running.try_lock().is_err()
    }

    /// Fetch every page and return the accumulated state
    ///
    /// Page failures, cancellation and the page guard end the run with a
    /// `Failed` state that keeps the listings gathered so far. The only
    /// `Err` is [`Error::AlreadyRunning`], returned when another run on this
    /// aggregator has not finished yet.
    pub async fn fetch_all(
        &self,
        context: &FetchContext,
        cancel: &CancellationToken,
    ) -> Result<AggregationState> {
        let _guard = self
            .running
            .try_lock()
            .map_err(|_| Error::AlreadyRunning)?;

        let mut state = AggregationState::loading(context);
        let mut cursor = PageCursor::new(context.start_page);

        info!(
            start_page = context.start_page,
            generation = context.generation,
            "Starting aggregation"
        );

        while !cursor.done {
            if let Some(max_pages) = self.config.max_pages {
                if cursor.pages_fetched >= max_pages {
                    warn!(max_pages, "Page limit reached before the last page");
                    state.fail(Error::MaxPagesExceeded { max_pages });
                    break;
                }
            }

            let fetched = tokio::select! {
                biased;
                () = cancel.cancelled() => Err(Error::Cancelled),
                page = self.source.fetch_page(cursor.page) => page,
            };

            match fetched {
                Ok(page) => {
                    let record_count = page.listings.len();
                    let total_pages = page.total_pages;
                    state.listings.extend(page.listings);

                    let requested = cursor.page;
                    let result = cursor.record_page(record_count, total_pages);
                    debug!(
                        page = requested,
                        records = record_count,
                        total_pages = ?total_pages,
                        accumulated = state.listings.len(),
                        "Page appended"
                    );
                    if let StopResult::Stop(reason) = result {
                        debug!(page = requested, ?reason, "Last page reached");
                    }
                }
                Err(e) => {
                    warn!(page = cursor.page, error = %e, "Aggregation stopped early");
                    cursor.mark_done();
                    state.fail(e);
                }
            }
        }

        if !state.is_failed() {
            state.succeed();
        }
        state.pages_fetched = cursor.pages_fetched;
        state.next_page = cursor.page;

        info!(
            status = ?state.status,
            listings = state.listings.len(),
            pages = state.pages_fetched,
            "Aggregation finished"
        );

        Ok(state)
    }
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("config", &self.config)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
