//! Tests for pagination module

use super::*;
use test_case::test_case;

// ============================================================================
// Stop Condition Tests
// ============================================================================

#[test_case(0, 1, None, StopResult::Stop(StopReason::EmptyPage) ; "empty page without total")]
#[test_case(0, 2, Some(5), StopResult::Stop(StopReason::EmptyPage) ; "empty page before total")]
#[test_case(10, 1, None, StopResult::Continue ; "records without total")]
#[test_case(10, 3, Some(5), StopResult::Continue ; "records before total")]
#[test_case(10, 5, Some(5), StopResult::Stop(StopReason::LastPage) ; "records on last page")]
#[test_case(10, 6, Some(5), StopResult::Continue ; "past total keeps going")]
fn test_check_stop_condition(count: usize, page: u32, total: Option<u32>, expected: StopResult) {
    assert_eq!(check_stop_condition(count, page, total), expected);
}

#[test]
fn test_stop_result_predicates() {
    assert!(StopResult::Continue.should_continue());
    assert!(!StopResult::Continue.should_stop());
    assert!(StopResult::Stop(StopReason::LastPage).should_stop());
    assert!(!StopResult::Stop(StopReason::EmptyPage).should_continue());
}

// ============================================================================
// PageCursor Tests
// ============================================================================

#[test]
fn test_page_cursor_default() {
    let cursor = PageCursor::default();
    assert_eq!(cursor.page, 1);
    assert_eq!(cursor.pages_fetched, 0);
    assert_eq!(cursor.total_fetched, 0);
    assert!(!cursor.done);
}

#[test]
fn test_page_cursor_advances_while_continuing() {
    let mut cursor = PageCursor::new(1);

    let result = cursor.record_page(20, Some(3));
    assert!(result.should_continue());
    assert_eq!(cursor.page, 2);
    assert_eq!(cursor.pages_fetched, 1);
    assert_eq!(cursor.total_fetched, 20);
    assert!(!cursor.done);
}

#[test]
fn test_page_cursor_increments_on_terminating_page() {
    let mut cursor = PageCursor::new(1);
    cursor.record_page(20, Some(2));

    let result = cursor.record_page(5, Some(2));
    assert_eq!(result, StopResult::Stop(StopReason::LastPage));
    assert!(cursor.done);
    assert_eq!(cursor.page, 3);
    assert_eq!(cursor.total_fetched, 25);
}

#[test]
fn test_page_cursor_uses_latest_total_pages() {
    let mut cursor = PageCursor::new(1);

    // Each page is compared against its own response's total only
    assert!(cursor.record_page(10, Some(4)).should_continue());
    assert!(cursor.record_page(10, Some(9)).should_continue());
    assert_eq!(
        cursor.record_page(10, Some(3)),
        StopResult::Stop(StopReason::LastPage)
    );
}

#[test]
fn test_page_cursor_shrinking_total_is_skipped_past() {
    let mut cursor = PageCursor::new(1);
    assert!(cursor.record_page(10, Some(5)).should_continue());
    // Page 2 reports only one page in total: 2 != 1, so the run continues
    assert!(cursor.record_page(10, Some(1)).should_continue());
    assert_eq!(cursor.page, 3);
}

#[test]
fn test_page_cursor_stops_at_last_page_index() {
    let mut cursor = PageCursor::new(u32::MAX);

    let result = cursor.record_page(10, None);
    assert_eq!(result, StopResult::Stop(StopReason::PageLimit));
    assert!(cursor.done);
    assert_eq!(cursor.page, u32::MAX);
    assert_eq!(cursor.total_fetched, 10);
}

#[test]
fn test_page_cursor_last_index_keeps_upstream_reason() {
    let mut cursor = PageCursor::new(u32::MAX);
    assert_eq!(
        cursor.record_page(0, None),
        StopResult::Stop(StopReason::EmptyPage)
    );
    assert!(cursor.done);
}

#[test]
fn test_page_cursor_mark_done() {
    let mut cursor = PageCursor::new(4);
    cursor.mark_done();
    assert!(cursor.done);
    assert_eq!(cursor.page, 4);
}
