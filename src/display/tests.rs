//! Tests for the display module

use super::*;
use crate::types::Column;
use pretty_assertions::assert_eq;

fn listing(name: &str, bar: &str, practice: Option<&str>) -> Listing {
    let listing = Listing::named(name).with(Column::BarNumber, bar);
    match practice {
        Some(practice) => listing.with(Column::Practice, practice),
        None => listing,
    }
}

fn sample() -> Vec<Listing> {
    vec![
        listing("Carol Diaz", "300", Some("Tax")),
        listing("alice Moore", "100", Some("Corporate")),
        listing("Bob Stone", "200", None),
        listing("Alice Moore", "101", Some("Tax")),
    ]
}

fn names(rows: &[&Listing]) -> Vec<String> {
    rows.iter()
        .map(|l| l.field(Column::Name).unwrap_or_default().into_owned())
        .collect()
}

// ============================================================================
// ListingTable
// ============================================================================

#[test]
fn test_table_keeps_arrival_order_without_sort() {
    let table = ListingTable::new(&sample());
    assert_eq!(
        names(&table.matching()),
        vec!["Carol Diaz", "alice Moore", "Bob Stone", "Alice Moore"]
    );
}

#[test]
fn test_table_search_is_case_insensitive_across_columns() {
    let options = TableOptions {
        search: Some("TAX".to_string()),
        ..Default::default()
    };
    let table = ListingTable::with_options(&sample(), options);
    assert_eq!(names(&table.matching()), vec!["Carol Diaz", "Alice Moore"]);

    let options = TableOptions {
        search: Some("200".to_string()),
        ..Default::default()
    };
    let table = ListingTable::with_options(&sample(), options);
    assert_eq!(names(&table.matching()), vec!["Bob Stone"]);
}

#[test]
fn test_table_blank_search_matches_everything() {
    let options = TableOptions {
        search: Some("   ".to_string()),
        ..Default::default()
    };
    let table = ListingTable::with_options(&sample(), options);
    assert_eq!(table.matching().len(), 4);
}

#[test]
fn test_table_sort_is_stable_and_case_insensitive() {
    let options = TableOptions {
        sort: Some(Column::Name),
        ..Default::default()
    };
    let table = ListingTable::with_options(&sample(), options);
    let rows = table.matching();

    assert_eq!(
        names(&rows),
        vec!["alice Moore", "Alice Moore", "Bob Stone", "Carol Diaz"]
    );
    assert_eq!(rows[0].field(Column::BarNumber).as_deref(), Some("100"));
}

#[test]
fn test_table_sort_descending_puts_missing_last() {
    let options = TableOptions {
        sort: Some(Column::Practice),
        order: SortOrder::Desc,
        ..Default::default()
    };
    let table = ListingTable::with_options(&sample(), options);
    assert_eq!(
        names(&table.matching()),
        vec!["Carol Diaz", "Alice Moore", "alice Moore", "Bob Stone"]
    );
}

#[test]
fn test_table_paging() {
    let listings: Vec<Listing> = (1..=23)
        .map(|i| listing(&format!("Person {i:02}"), &i.to_string(), None))
        .collect();
    let options = TableOptions {
        page: 3,
        ..Default::default()
    };
    let table = ListingTable::with_options(&listings, options);
    let page = table.page();

    assert_eq!(page.pages, 3);
    assert_eq!(page.page, 3);
    assert_eq!(page.rows.len(), 3);
    assert_eq!(page.start, 21);
    assert_eq!(page.end, 23);
    assert_eq!(page.info(), "Showing 21 to 23 of 23 entries");
}

#[test]
fn test_table_page_is_clamped() {
    let options = TableOptions {
        page: 99,
        page_length: 2,
        ..Default::default()
    };
    let table = ListingTable::with_options(&sample(), options);
    let page = table.page();

    assert_eq!(page.page, 2);
    assert_eq!(page.start, 3);
    assert_eq!(page.end, 4);
}

#[test]
fn test_table_info_mentions_filtering() {
    let options = TableOptions {
        search: Some("moore".to_string()),
        ..Default::default()
    };
    let table = ListingTable::with_options(&sample(), options);
    assert_eq!(
        table.page().info(),
        "Showing 1 to 2 of 2 entries (filtered from 4 total entries)"
    );
}

#[test]
fn test_table_empty() {
    let table = ListingTable::new(&[]);
    let page = table.page();
    assert!(table.is_empty());
    assert_eq!(page.pages, 1);
    assert_eq!(page.info(), "Showing 0 to 0 of 0 entries");

    let rendered = table.render();
    assert!(rendered.contains("No matching records found"));
}

#[test]
fn test_table_render() {
    let table = ListingTable::new(&[listing("Carol Diaz", "300", Some("Tax"))]);
    let rendered = table.render();
    let lines: Vec<&str> = rendered.lines().collect();

    assert!(lines[0].starts_with("Image | Name"));
    assert!(lines[0].contains("Bar Number"));
    assert!(lines[1].starts_with("-----"));
    assert!(lines[2].contains("Carol Diaz"));
    assert!(lines[2].contains("300"));
    assert_eq!(lines[3], "Showing 1 to 1 of 1 entries");
}

#[test]
fn test_table_render_truncates_long_cells() {
    let long = listing("X", "1", None).with(Column::Address, "A".repeat(100));
    let rendered = ListingTable::new(&[long]).render();

    assert!(rendered.contains(&format!("{}...", "A".repeat(37))));
    assert!(!rendered.contains(&"A".repeat(41)));
}

// ============================================================================
// TableDisplay
// ============================================================================

#[test]
fn test_display_rebuild_replaces_table() {
    let mut display = TableDisplay::new(TableOptions::default());
    assert!(display.table().is_none());
    assert_eq!(display.render(), "");

    display.rebuild(&sample());
    assert_eq!(display.table().unwrap().len(), 4);

    display.rebuild(&sample()[..1]);
    assert_eq!(display.table().unwrap().len(), 1);
    assert_eq!(display.builds(), 2);
}

#[test]
fn test_display_options_survive_rebuild() {
    let mut display = TableDisplay::default();
    display.rebuild(&sample());
    display.set_options(TableOptions {
        search: Some("bob".to_string()),
        ..Default::default()
    });
    assert_eq!(display.table().unwrap().matching().len(), 1);

    display.rebuild(&sample());
    assert_eq!(display.table().unwrap().matching().len(), 1);
}
