//! Listing table with search, sort and paging

use crate::types::{Column, Listing};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Write as _;

/// Default number of rows per table page
pub const DEFAULT_PAGE_LENGTH: usize = 10;

/// Cells longer than this are truncated when rendered as text
const MAX_CELL_WIDTH: usize = 40;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// View options applied to a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOptions {
    /// Case-insensitive search across every column
    #[serde(default)]
    pub search: Option<String>,
    /// Column to sort by
    #[serde(default)]
    pub sort: Option<Column>,
    /// Sort direction
    #[serde(default)]
    pub order: SortOrder,
    /// 1-based table page
    #[serde(default = "default_page")]
    pub page: usize,
    /// Rows per table page
    #[serde(default = "default_page_length")]
    pub page_length: usize,
}

fn default_page() -> usize {
    1
}

fn default_page_length() -> usize {
    DEFAULT_PAGE_LENGTH
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            search: None,
            sort: None,
            order: SortOrder::Asc,
            page: default_page(),
            page_length: default_page_length(),
        }
    }
}

/// One rendered page of a table
#[derive(Debug, Clone, Serialize)]
pub struct TablePage<'a> {
    /// Rows on this page
    pub rows: Vec<&'a Listing>,
    /// 1-based page shown (clamped to the last page)
    pub page: usize,
    /// Number of pages after filtering
    pub pages: usize,
    /// Rows matching the search
    pub filtered: usize,
    /// Rows in the table
    pub total: usize,
    /// Index of the first row shown (1-based, 0 when empty)
    pub start: usize,
    /// Index of the last row shown
    pub end: usize,
}

impl TablePage<'_> {
    /// Summary line, e.g. "Showing 1 to 10 of 57 entries"
    pub fn info(&self) -> String {
        let mut info = format!(
            "Showing {} to {} of {} entries",
            self.start, self.end, self.filtered
        );
        if self.filtered != self.total {
            let _ = write!(info, " (filtered from {} total entries)", self.total);
        }
        info
    }
}

/// Table over an aggregated collection
///
/// A table is built from one snapshot of the collection and never
/// mutated to follow it; a changed collection gets a new table.
#[derive(Debug, Clone)]
pub struct ListingTable {
    rows: Vec<Listing>,
    options: TableOptions,
}

impl ListingTable {
    /// Build a table with default options
    pub fn new(listings: &[Listing]) -> Self {
        Self::with_options(listings, TableOptions::default())
    }

    /// Build a table with the given options
    pub fn with_options(listings: &[Listing], options: TableOptions) -> Self {
        Self {
            rows: listings.to_vec(),
            options,
        }
    }

    /// Current view options
    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Replace the view options
    pub fn set_options(&mut self, options: TableOptions) {
        self.options = options;
    }

    /// Number of rows in the table
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows matching the search, in sort order
    pub fn matching(&self) -> Vec<&Listing> {
        let needle = self
            .options
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut rows: Vec<&Listing> = self
            .rows
            .iter()
            .filter(|listing| match &needle {
                Some(needle) => matches_search(listing, needle),
                None => true,
            })
            .collect();

        if let Some(column) = self.options.sort {
            // Stable sort keeps arrival order between equal keys
            rows.sort_by(|a, b| {
                let ordering = compare_cells(a.field(column).as_deref(), b.field(column).as_deref());
                match self.options.order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }
        rows
    }

    /// The requested page of matching rows
    pub fn page(&self) -> TablePage<'_> {
        let matching = self.matching();
        let filtered = matching.len();
        let page_length = self.options.page_length.max(1);
        let pages = filtered.div_ceil(page_length).max(1);
        let page = self.options.page.clamp(1, pages);

        let offset = (page - 1) * page_length;
        let rows: Vec<&Listing> = matching.into_iter().skip(offset).take(page_length).collect();
        let (start, end) = if rows.is_empty() {
            (0, 0)
        } else {
            (offset + 1, offset + rows.len())
        };

        TablePage {
            rows,
            page,
            pages,
            filtered,
            total: self.rows.len(),
            start,
            end,
        }
    }

    /// Render the requested page as a plain-text table
    pub fn render(&self) -> String {
        let page = self.page();

        let cells: Vec<Vec<String>> = page
            .rows
            .iter()
            .map(|listing| {
                Column::ALL
                    .iter()
                    .map(|column| truncate(&listing.field(*column).unwrap_or_default()))
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = Column::ALL
            .iter()
            .enumerate()
            .map(|(i, column)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(column.header().len()))
                    .max()
                    .unwrap_or_default()
            })
            .collect();

        let mut out = String::new();
        let headers: Vec<&str> = Column::ALL.iter().map(|c| c.header()).collect();
        push_row(&mut out, &headers, &widths);

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        let rule: Vec<&str> = rule.iter().map(String::as_str).collect();
        push_row(&mut out, &rule, &widths);

        if cells.is_empty() {
            out.push_str("No matching records found\n");
        }
        for row in &cells {
            let row: Vec<&str> = row.iter().map(String::as_str).collect();
            push_row(&mut out, &row, &widths);
        }

        out.push_str(&page.info());
        out.push('\n');
        out
    }
}

fn matches_search(listing: &Listing, needle: &str) -> bool {
    Column::ALL.iter().any(|column| {
        listing
            .field(*column)
            .is_some_and(|value| value.to_lowercase().contains(needle))
    })
}

/// Missing values sort before present ones; text compares case-insensitively
fn compare_cells(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

fn truncate(value: &str) -> String {
    let value = value.replace(['\n', '\r'], " ");
    if value.chars().count() <= MAX_CELL_WIDTH {
        value
    } else {
        let mut cut: String = value.chars().take(MAX_CELL_WIDTH - 3).collect();
        cut.push_str("...");
        cut
    }
}

fn push_row(out: &mut String, cells: &[&str], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join(" | ").trim_end());
    out.push('\n');
}
