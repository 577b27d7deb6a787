//! Engine types
//!
//! Run context, configuration and the aggregation state handed to consumers.

use crate::error::Error;
use crate::types::Listing;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Parameters of one aggregation run
///
/// Passed explicitly into every `fetch_all` call so runs never share a
/// page counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchContext {
    /// First page to request (1-based)
    #[serde(default = "default_start_page")]
    pub start_page: u32,
    /// Caller-assigned run number, bumped on every trigger change
    #[serde(default)]
    pub generation: u64,
}

fn default_start_page() -> u32 {
    1
}

impl Default for FetchContext {
    fn default() -> Self {
        Self {
            start_page: default_start_page(),
            generation: 0,
        }
    }
}

impl FetchContext {
    /// Create a context starting at the given page
    pub fn starting_at(start_page: u32) -> Self {
        Self {
            start_page,
            ..Default::default()
        }
    }

    /// Same parameters, next generation
    #[must_use]
    pub fn next_generation(&self) -> Self {
        Self {
            start_page: self.start_page,
            generation: self.generation + 1,
        }
    }
}

/// Configuration for the aggregator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Stop with `MaxPagesExceeded` after this many pages (None = unbounded)
    pub max_pages: Option<u32>,
}

impl AggregatorConfig {
    /// Bound the number of pages a run may fetch
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = Some(max_pages);
        self
    }
}

/// Lifecycle of an aggregation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationStatus {
    /// No run has started yet
    Idle,
    /// A run is in progress
    Loading,
    /// The run reached the last page
    Success,
    /// The run stopped on an error; listings hold the partial result
    Failed,
}

/// Accumulated result of one aggregation run
#[derive(Debug, Serialize)]
pub struct AggregationState {
    /// Current lifecycle status
    pub status: AggregationStatus,
    /// Listings in arrival order
    pub listings: Vec<Listing>,
    /// Error that stopped the run, if any
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<Error>,
    /// Context the run was started with
    pub context: FetchContext,
    /// Pages fetched successfully
    pub pages_fetched: u32,
    /// Page a resumed run would request next
    pub next_page: u32,
    /// When the run started
    pub started_at: Option<DateTime<Utc>>,
    /// When the run finished
    pub finished_at: Option<DateTime<Utc>>,
}

fn serialize_error<S: Serializer>(
    error: &Option<Error>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match error {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

impl Default for AggregationState {
    fn default() -> Self {
        Self::idle()
    }
}

impl AggregationState {
    /// State before any run
    pub fn idle() -> Self {
        Self {
            status: AggregationStatus::Idle,
            listings: Vec::new(),
            error: None,
            context: FetchContext::default(),
            pages_fetched: 0,
            next_page: 1,
            started_at: None,
            finished_at: None,
        }
    }

    /// Fresh state for a run that is starting now
    pub fn loading(context: &FetchContext) -> Self {
        Self {
            status: AggregationStatus::Loading,
            context: context.clone(),
            next_page: context.start_page,
            started_at: Some(Utc::now()),
            ..Self::idle()
        }
    }

    /// Finish the run successfully
    pub(crate) fn succeed(&mut self) {
        self.status = AggregationStatus::Success;
        self.error = None;
        self.finished_at = Some(Utc::now());
    }

    /// Finish the run with an error, keeping accumulated listings
    pub(crate) fn fail(&mut self, error: Error) {
        self.status = AggregationStatus::Failed;
        self.error = Some(error);
        self.finished_at = Some(Utc::now());
    }

    /// Check if a run is in progress
    pub fn is_loading(&self) -> bool {
        self.status == AggregationStatus::Loading
    }

    /// Check if the run reached a terminal status
    pub fn is_finished(&self) -> bool {
        matches!(
            self.status,
            AggregationStatus::Success | AggregationStatus::Failed
        )
    }

    /// Check if the run completed without error
    pub fn is_success(&self) -> bool {
        self.status == AggregationStatus::Success
    }

    /// Check if the run stopped on an error
    pub fn is_failed(&self) -> bool {
        self.status == AggregationStatus::Failed
    }

    /// Check if the run failed after accumulating some listings
    pub fn is_partial(&self) -> bool {
        self.is_failed() && !self.listings.is_empty()
    }

    /// Error that stopped the run
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Listings in arrival order
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    /// Number of listings accumulated
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Check if no listings were accumulated
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Run duration, once finished
    pub fn duration_ms(&self) -> Option<i64> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some((end - start).num_milliseconds()),
            _ => None,
        }
    }
}
