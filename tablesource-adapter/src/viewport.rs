use tablesource::ViewRange;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    Auto,
}

/// Geometry of a table whose rows all have the same height.
///
/// Turns a scroll offset and a viewport height into the row range a viewer should report.
/// All sizes are in the UI's units (pixels, terminal cells, ...).
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowViewport {
    pub row_height: u32,
    pub viewport_height: u32,
    pub scroll_offset: u64,
    /// Extra rows delivered on each side of the visible range.
    pub overscan: usize,
    pub count: usize,
}

impl RowViewport {
    pub fn new(row_height: u32, count: usize) -> Self {
        Self {
            row_height: row_height.max(1),
            viewport_height: 0,
            scroll_offset: 0,
            overscan: 1,
            count,
        }
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_viewport_height(mut self, viewport_height: u32) -> Self {
        self.viewport_height = viewport_height;
        self
    }

    fn row_height(&self) -> u64 {
        self.row_height.max(1) as u64
    }

    pub fn total_height(&self) -> u64 {
        (self.count as u64).saturating_mul(self.row_height())
    }

    pub fn max_scroll_offset(&self) -> u64 {
        self.total_height()
            .saturating_sub(self.viewport_height as u64)
    }

    pub fn clamp_scroll_offset(&self, offset: u64) -> u64 {
        offset.min(self.max_scroll_offset())
    }

    pub fn row_start(&self, index: usize) -> u64 {
        (index as u64).saturating_mul(self.row_height())
    }

    /// The row under `offset`, if any.
    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        let index = (offset / self.row_height()) as usize;
        Some(index.min(self.count - 1))
    }

    /// Rows intersecting the viewport, without overscan.
    ///
    /// An empty viewport yields a window starting past the last row, which selects nothing.
    pub fn visible_range(&self) -> ViewRange {
        if self.count == 0 || self.viewport_height == 0 {
            return ViewRange::from_start(self.count);
        }
        let offset = self.clamp_scroll_offset(self.scroll_offset);
        let h = self.row_height();
        let start = ((offset / h) as usize).min(self.count);
        let end_offset = offset.saturating_add(self.viewport_height as u64);
        let end = (end_offset.div_ceil(h) as usize).min(self.count);
        if end <= start {
            return ViewRange::from_start(self.count);
        }
        ViewRange::new(start, end)
    }

    /// The visible range widened by `overscan` rows on both sides.
    pub fn rendered_range(&self) -> ViewRange {
        let visible = self.visible_range();
        if !visible.is_bounded() {
            return visible;
        }
        ViewRange::new(
            visible.start.saturating_sub(self.overscan),
            visible
                .end
                .saturating_add(self.overscan)
                .min(self.count),
        )
    }

    /// The (clamped) scroll offset that brings row `index` into view.
    pub fn scroll_to_index_offset(&self, index: usize, align: Align) -> u64 {
        let index = index.min(self.count.saturating_sub(1));
        let start = self.row_start(index);
        let end = start.saturating_add(self.row_height());
        let view = self.viewport_height as u64;
        let current = self.clamp_scroll_offset(self.scroll_offset);

        let target = match align {
            Align::Start => start,
            Align::End => end.saturating_sub(view),
            Align::Center => (start + end).saturating_sub(view) / 2,
            Align::Auto => {
                if start < current {
                    start
                } else if end > current.saturating_add(view) {
                    end.saturating_sub(view)
                } else {
                    current
                }
            }
        };
        self.clamp_scroll_offset(target)
    }
}
