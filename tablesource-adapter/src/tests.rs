use crate::*;

use alloc::rc::Rc;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::RefCell;

use tablesource::{
    DataSource, DataSourceOptions, FieldRecord, PENDING_ROW_ID, Row, RowId, ViewRange, ViewerId,
};

fn source(n: usize, prepend: bool) -> DataSource<FieldRecord> {
    let records: Arc<[FieldRecord]> = (0..n)
        .map(|i| FieldRecord::new().with("n", i as i64))
        .collect();
    DataSource::new(
        records,
        DataSourceOptions::new().with_prepend_new_elements(prepend),
    )
    .unwrap()
}

#[test]
fn visible_and_rendered_ranges() {
    let mut vp = RowViewport::new(2, 100).with_viewport_height(10);
    assert_eq!(vp.total_height(), 200);
    assert_eq!(vp.visible_range(), ViewRange::new(0, 5));
    assert_eq!(vp.rendered_range(), ViewRange::new(0, 6));

    vp.scroll_offset = 51;
    assert_eq!(vp.visible_range(), ViewRange::new(25, 31));
    assert_eq!(vp.rendered_range(), ViewRange::new(24, 32));

    vp.scroll_offset = 10_000;
    assert_eq!(vp.visible_range(), ViewRange::new(95, 100));
    assert_eq!(vp.rendered_range(), ViewRange::new(94, 100));
}

#[test]
fn empty_viewport_selects_nothing() {
    let vp = RowViewport::new(1, 10);
    let items: Vec<u32> = (0..10).collect();
    assert!(tablesource::window(&items, vp.visible_range()).is_empty());
    assert!(tablesource::window(&items, vp.rendered_range()).is_empty());
    assert_eq!(RowViewport::new(1, 0).index_at_offset(0), None);
}

#[test]
fn scroll_to_index_aligns() {
    let vp = RowViewport::new(1, 100).with_viewport_height(10);
    assert_eq!(vp.scroll_to_index_offset(50, Align::Start), 50);
    assert_eq!(vp.scroll_to_index_offset(50, Align::End), 41);
    assert_eq!(vp.scroll_to_index_offset(50, Align::Center), 45);
    assert_eq!(vp.scroll_to_index_offset(5, Align::Auto), 0);
    assert_eq!(vp.scroll_to_index_offset(99, Align::Start), 90);
}

#[test]
fn controller_reports_range_changes() {
    let mut s = source(100, false);
    let log: Rc<RefCell<Vec<Vec<RowId>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let mut c = ViewerController::connect(
        &mut s,
        ViewerId(1),
        RowViewport::new(1, 0)
            .with_viewport_height(10)
            .with_overscan(0),
        move |rows| sink.borrow_mut().push(rows.iter().map(Row::id).collect()),
    );
    assert_eq!(c.viewport().count, 100);
    assert_eq!(log.borrow().last().unwrap().len(), 10);

    assert!(c.on_scroll(20));
    assert!(!c.on_scroll(20));
    assert_eq!(s.viewer_range(ViewerId(1)), Some(ViewRange::new(20, 30)));

    // Applied at the next publication.
    s.delete(0).unwrap();
    assert_eq!(log.borrow().last().unwrap().first(), Some(&20));

    assert!(!c.on_count(s.len()));
    assert!(c.on_viewport_size(5));
    assert!(c.sync(&mut s));
    assert_eq!(log.borrow().last().unwrap().len(), 5);

    s.disconnect(ViewerId(1));
    assert!(!c.sync(&mut s));
}

#[test]
fn controller_scroll_to_index() {
    let mut s = source(50, false);
    let mut c =
        ViewerController::connect(&mut s, ViewerId(3), RowViewport::new(2, 0), |_rows| {});
    c.on_viewport_size(10);
    assert_eq!(c.scroll_to_index(49, Align::End), 90);
    assert_eq!(c.range(), ViewRange::new(44, 50));
}

#[test]
fn anchor_survives_prepend_in_prepend_mode() {
    let mut s = source(100, true);
    let mut vp = RowViewport::new(1, s.len()).with_viewport_height(10);
    vp.scroll_offset = 50;

    let anchor = capture_first_visible_anchor(&vp, s.rows()).unwrap();
    assert_eq!(anchor.row_id, 49);
    assert_eq!(anchor.offset_in_viewport, 0);

    // A committed row lands at the front; existing ids stay put.
    s.create_new(None);
    s.confirm_create(PENDING_ROW_ID).unwrap();
    assert_eq!(s.rows()[51].id(), 49);

    vp.count = s.len();
    assert!(apply_anchor(&mut vp, s.rows(), &anchor));
    assert_eq!(vp.scroll_offset, 51);
}

#[test]
fn controller_apply_anchor_reports_new_range() {
    let mut s = source(30, true);
    let mut c = ViewerController::connect(
        &mut s,
        ViewerId(1),
        RowViewport::new(1, 0)
            .with_viewport_height(5)
            .with_overscan(0),
        |_rows| {},
    );
    c.on_scroll(10);
    let anchor = c.capture_first_visible_anchor(s.rows()).unwrap();

    s.batch_update(|s| {
        for _ in 0..3 {
            s.create_new(None);
            s.confirm_create(PENDING_ROW_ID).unwrap();
        }
    });
    assert!(c.apply_anchor(s.rows(), &anchor));
    assert_eq!(c.range(), ViewRange::new(13, 18));
    assert_eq!(s.viewer_range(ViewerId(1)), Some(ViewRange::new(13, 18)));

    let missing = RowAnchor {
        row_id: 999,
        offset_in_viewport: 0,
    };
    assert!(!c.apply_anchor(s.rows(), &missing));
}
