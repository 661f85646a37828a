use core::fmt;

use tablesource::{Record, Row, RowId, index_from_row_id};

use crate::RowViewport;

/// A scroll anchor that keeps the viewport on the same row across data changes.
///
/// Row ids survive inserts at the numbering mode's natural end (new rows appended in append
/// mode, prepended in prepend mode), which is the typical "load older entries above" case.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RowAnchor {
    pub row_id: RowId,
    /// The distance from the anchor row's start to the viewport's scroll offset.
    pub offset_in_viewport: u64,
}

impl fmt::Debug for RowAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowAnchor")
            .field("row_id", &self.row_id)
            .field("offset_in_viewport", &self.offset_in_viewport)
            .finish()
    }
}

/// Captures an anchor for the first visible row.
///
/// Returns `None` if nothing is visible.
pub fn capture_first_visible_anchor<T: Record>(
    viewport: &RowViewport,
    rows: &[Row<T>],
) -> Option<RowAnchor> {
    let visible = viewport.visible_range();
    if !visible.is_bounded() {
        return None;
    }
    let row = rows.get(visible.start)?;
    let start = viewport.row_start(visible.start);
    let offset = viewport.clamp_scroll_offset(viewport.scroll_offset);
    Some(RowAnchor {
        row_id: row.id(),
        offset_in_viewport: offset.saturating_sub(start),
    })
}

/// Applies a previously captured anchor by adjusting `viewport.scroll_offset`.
///
/// `rows` is the *current* sequence; `viewport.count` should already match it.
///
/// Returns `true` when the anchor row was found.
pub fn apply_anchor<T: Record>(
    viewport: &mut RowViewport,
    rows: &[Row<T>],
    anchor: &RowAnchor,
) -> bool {
    let Some(index) = index_from_row_id(anchor.row_id, rows) else {
        return false;
    };
    let target = viewport
        .row_start(index)
        .saturating_add(anchor.offset_in_viewport);
    viewport.scroll_offset = viewport.clamp_scroll_offset(target);
    true
}
