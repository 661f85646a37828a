use alloc::rc::Rc;
use core::cell::Cell;

/// Identifies an attached viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewerId(pub u64);

/// A visible index range reported by a viewer.
///
/// `[start, end)` when `end > start`; otherwise the range is open-ended and covers everything
/// from `start` on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewRange {
    pub start: usize,
    pub end: usize, // exclusive
}

impl ViewRange {
    /// The whole sequence.
    pub const ALL: Self = Self { start: 0, end: 0 };

    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn from_start(start: usize) -> Self {
        Self { start, end: start }
    }

    pub fn is_bounded(&self) -> bool {
        self.end > self.start
    }

    /// The index range this window selects out of `len` items.
    pub fn clamp(&self, len: usize) -> core::ops::Range<usize> {
        let start = self.start.min(len);
        let end = if self.is_bounded() {
            self.end.min(len)
        } else {
            len
        };
        start..end
    }
}

/// Slices `items` down to `range`.
pub fn window<T>(items: &[T], range: ViewRange) -> &[T] {
    &items[range.clamp(items.len())]
}

/// The viewer's side of a range channel.
///
/// A viewer keeps its reporter and calls [`RangeReporter::report`] whenever its visible range
/// changes. The data source reads the latest value each time it delivers rows.
#[derive(Clone, Debug, Default)]
pub struct RangeReporter {
    range: Rc<Cell<ViewRange>>,
}

impl RangeReporter {
    pub fn new(range: ViewRange) -> Self {
        Self {
            range: Rc::new(Cell::new(range)),
        }
    }

    pub fn report(&self, range: ViewRange) {
        self.range.set(range);
    }

    pub fn current(&self) -> ViewRange {
        self.range.get()
    }
}
