//! Display module
//!
//! Tabular rendering of an aggregated collection. Search, sort and paging
//! all happen over data that is already in memory; nothing here talks to
//! the upstream.

mod table;

pub use table::{ListingTable, SortOrder, TableOptions, TablePage, DEFAULT_PAGE_LENGTH};

use crate::types::Listing;
use tracing::debug;

/// Consumer that shows the aggregated collection
pub trait DisplaySink {
    /// Tear down whatever is shown and rebuild it from `listings`
    fn rebuild(&mut self, listings: &[Listing]);
}

/// Display sink holding one [`ListingTable`] at a time
///
/// View options survive a rebuild; the table itself does not.
#[derive(Debug, Default)]
pub struct TableDisplay {
    table: Option<ListingTable>,
    options: TableOptions,
    builds: u64,
}

impl TableDisplay {
    /// Create an empty display
    pub fn new(options: TableOptions) -> Self {
        Self {
            table: None,
            options,
            builds: 0,
        }
    }

    /// The current table, if one has been built
    pub fn table(&self) -> Option<&ListingTable> {
        self.table.as_ref()
    }

    /// Change view options on the current table
    pub fn set_options(&mut self, options: TableOptions) {
        if let Some(table) = self.table.as_mut() {
            table.set_options(options.clone());
        }
        self.options = options;
    }

    /// Number of times a table has been built
    pub fn builds(&self) -> u64 {
        self.builds
    }

    /// Render the current table
    pub fn render(&self) -> String {
        self.table
            .as_ref()
            .map(ListingTable::render)
            .unwrap_or_default()
    }
}

impl DisplaySink for TableDisplay {
    fn rebuild(&mut self, listings: &[Listing]) {
        // Drop the old table before building the new one
        self.table = None;
        self.table = Some(ListingTable::with_options(listings, self.options.clone()));
        self.builds += 1;
        debug!(rows = listings.len(), builds = self.builds, "Table rebuilt");
    }
}

#[cfg(test)]
mod tests;
