//! Row numbering.
//!
//! Ids are assigned over committed rows only: the pending row keeps [`PENDING_ROW_ID`] and does
//! not take a position, so committed ids stay contiguous wherever the pending row sits.

use crate::{PENDING_ROW_ID, Record, Row, RowId};

/// Maps a committed position to its id.
///
/// Append mode numbers rows front to back; prepend mode numbers them back to front, so id 0 is
/// always the last row.
pub fn row_id_from_index(index: usize, count: usize, prepend: bool) -> RowId {
    if prepend {
        count.saturating_sub(1).saturating_sub(index) as RowId
    } else {
        index as RowId
    }
}

/// Finds the sequence index of the row with `id`.
///
/// This is a linear scan.
pub fn index_from_row_id<T: Record>(id: RowId, rows: &[Row<T>]) -> Option<usize> {
    rows.iter().position(|row| row.id == id)
}

/// Reassigns ids after a structural change at `from_index`.
///
/// Append mode walks from `from_index` to the end; prepend mode walks from `from_index` toward
/// the start. Rows on the other side keep their ids, which is correct for both modes after a
/// single insert or removal at `from_index`.
pub fn update_row_ids<T: Record>(from_index: usize, rows: &mut [Row<T>], prepend: bool) {
    let count = rows.iter().filter(|row| !row.is_pending()).count();
    let from = from_index.min(rows.len());
    let (head, tail) = rows.split_at_mut(from);
    let committed_before = head.iter().filter(|row| !row.is_pending()).count();

    if prepend {
        // `tail[0]` (if any) is renumbered together with the head.
        let upto = if tail.is_empty() { 0 } else { 1 };
        let (pivot, _) = tail.split_at_mut(upto);
        let mut position = 0usize;
        for row in head.iter_mut().chain(pivot.iter_mut()) {
            if row.id == PENDING_ROW_ID {
                continue;
            }
            row.id = row_id_from_index(position, count, true);
            position += 1;
        }
    } else {
        let mut position = committed_before;
        for row in tail.iter_mut() {
            if row.id == PENDING_ROW_ID {
                continue;
            }
            row.id = row_id_from_index(position, count, false);
            position += 1;
        }
    }
}

/// Renumbers the whole sequence.
pub fn renumber_all<T: Record>(rows: &mut [Row<T>], prepend: bool) {
    if prepend {
        update_row_ids(rows.len(), rows, true);
    } else {
        update_row_ids(0, rows, false);
    }
}
