//! Pagination types
//!
//! Page counter state and the termination test used by the aggregator.

use serde::Serialize;

/// Why pagination stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The page carried no records
    EmptyPage,
    /// The page index matched the reported total page count
    LastPage,
    /// The page index cannot be advanced any further
    PageLimit,
}

/// Result of checking the stop condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopResult {
    /// Request the next page
    Continue,
    /// Stop pagination
    Stop(StopReason),
}

impl StopResult {
    /// Check if we should continue
    pub fn should_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    /// Check if we should stop
    pub fn should_stop(&self) -> bool {
        matches!(self, Self::Stop(_))
    }
}

/// Check whether the page just fetched was the last one
///
/// `total_pages` must come from the response for `page`; there is no
/// running maximum across responses.
pub fn check_stop_condition(
    records_count: usize,
    page: u32,
    total_pages: Option<u32>,
) -> StopResult {
    if records_count == 0 {
        StopResult::Stop(StopReason::EmptyPage)
    } else if total_pages == Some(page) {
        StopResult::Stop(StopReason::LastPage)
    } else {
        StopResult::Continue
    }
}

/// Tracks pagination state during one aggregation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    /// Index of the next page to request (1-based)
    pub page: u32,
    /// Pages fetched successfully so far
    pub pages_fetched: u32,
    /// Records fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new(1)
    }
}

impl PageCursor {
    /// Create a cursor starting at the given page
    pub fn new(start_page: u32) -> Self {
        Self {
            page: start_page,
            pages_fetched: 0,
            total_fetched: 0,
            done: false,
        }
    }

    /// Record a fetched page and advance the counter
    ///
    /// The stop check runs against the current index before it is
    /// incremented. The increment happens even when the run stops, so
    /// `page` always names the page a resumed run would request next.
    /// A page index that would overflow stops the run in place.
    pub fn record_page(&mut self, records_count: usize, total_pages: Option<u32>) -> StopResult {
        self.pages_fetched = self.pages_fetched.saturating_add(1);
        self.total_fetched += records_count as u64;

        let mut result = check_stop_condition(records_count, self.page, total_pages);
        match self.page.checked_add(1) {
            Some(next) => self.page = next,
            None if result.should_continue() => result = StopResult::Stop(StopReason::PageLimit),
            None => {}
        }
        if result.should_stop() {
            self.done = true;
        }
        result
    }

    /// Mark pagination as complete without recording a page
    pub fn mark_done(&mut self) {
        self.done = true;
    }
}
