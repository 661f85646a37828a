use tablesource::{DataSource, RangeReporter, Record, Row, ViewRange, ViewerId};

use crate::{Align, RowAnchor, RowViewport, apply_anchor, capture_first_visible_anchor};

/// A framework-neutral controller that keeps one viewer's range in step with its viewport.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_viewport_size` / `on_scroll` when UI events occur
/// - `on_count` when the source's row count changes
///
/// Each call recomputes the rendered range (visible rows plus overscan) and, when it changed,
/// reports it on the viewer's range channel. The source applies it at its next publication;
/// use [`ViewerController::sync`] to have the source re-deliver right away.
#[derive(Clone, Debug)]
pub struct ViewerController {
    viewer: ViewerId,
    reporter: RangeReporter,
    viewport: RowViewport,
    reported: Option<ViewRange>,
}

impl ViewerController {
    /// Wraps an already connected viewer and reports its initial range.
    pub fn new(viewer: ViewerId, reporter: RangeReporter, viewport: RowViewport) -> Self {
        let mut c = Self {
            viewer,
            reporter,
            viewport,
            reported: None,
        };
        c.report();
        c
    }

    /// Connects `viewer` to `source` and delivers its first window immediately.
    pub fn connect<T: Record>(
        source: &mut DataSource<T>,
        viewer: ViewerId,
        viewport: RowViewport,
        sink: impl FnMut(&[Row<T>]) + 'static,
    ) -> Self {
        let reporter = source.connect(viewer, sink);
        let viewport = RowViewport {
            count: source.len(),
            ..viewport
        };
        let c = Self::new(viewer, reporter, viewport);
        c.sync(source);
        c
    }

    pub fn viewer(&self) -> ViewerId {
        self.viewer
    }

    pub fn viewport(&self) -> &RowViewport {
        &self.viewport
    }

    pub fn range(&self) -> ViewRange {
        self.viewport.rendered_range()
    }

    /// Returns `true` if the reported range changed.
    pub fn on_viewport_size(&mut self, viewport_height: u32) -> bool {
        self.viewport.viewport_height = viewport_height;
        self.report()
    }

    /// Applies a scroll offset (clamped) from the UI.
    ///
    /// Returns `true` if the reported range changed.
    pub fn on_scroll(&mut self, scroll_offset: u64) -> bool {
        self.viewport.scroll_offset = self.viewport.clamp_scroll_offset(scroll_offset);
        self.report()
    }

    /// Returns `true` if the reported range changed.
    pub fn on_count(&mut self, count: usize) -> bool {
        self.viewport.count = count;
        self.viewport.scroll_offset = self
            .viewport
            .clamp_scroll_offset(self.viewport.scroll_offset);
        self.report()
    }

    /// Scrolls so row `index` is in view, returning the applied offset.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> u64 {
        let offset = self.viewport.scroll_to_index_offset(index, align);
        self.on_scroll(offset);
        self.viewport.scroll_offset
    }

    /// Reports the current range through the source, which re-delivers this viewer's window.
    ///
    /// Returns `false` if the viewer is no longer connected.
    pub fn sync<T: Record>(&self, source: &mut DataSource<T>) -> bool {
        source.report_range(self.viewer, self.range())
    }

    pub fn capture_first_visible_anchor<T: Record>(&self, rows: &[Row<T>]) -> Option<RowAnchor> {
        capture_first_visible_anchor(&self.viewport, rows)
    }

    /// Re-applies `anchor` against the current rows (updating the row count first).
    ///
    /// Returns `true` when the anchor row was found.
    pub fn apply_anchor<T: Record>(&mut self, rows: &[Row<T>], anchor: &RowAnchor) -> bool {
        self.viewport.count = rows.len();
        let applied = apply_anchor(&mut self.viewport, rows, anchor);
        self.report();
        applied
    }

    fn report(&mut self) -> bool {
        let range = self.viewport.rendered_range();
        if self.reported == Some(range) {
            return false;
        }
        atrace!(
            viewer = self.viewer.0,
            start = range.start,
            end = range.end,
            "report"
        );
        self.reporter.report(range);
        self.reported = Some(range);
        true
    }
}
