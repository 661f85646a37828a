use alloc::boxed::Box;

use crate::{Record, ValidationHandle};

/// Row identity within the current render order.
pub type RowId = i64;

/// The id reserved for the single uncommitted new row.
pub const PENDING_ROW_ID: RowId = -1;

/// One line of the table: a record plus identity, editing state and validity.
///
/// The record lives inside the row's validation handle, so `current_data` always reflects what
/// the handle validates. Rows are owned by a [`crate::DataSource`]; consumers only ever see them
/// through shared references.
pub struct Row<T: Record> {
    pub(crate) id: RowId,
    pub(crate) original_data: Option<T>,
    validator: Box<dyn ValidationHandle<T>>,
}

impl<T: Record> Row<T> {
    pub(crate) fn new(
        id: RowId,
        editing: bool,
        validator: Box<dyn ValidationHandle<T>>,
    ) -> Self {
        let mut row = Self {
            id,
            original_data: None,
            validator,
        };
        row.set_editing(editing);
        row
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    /// `true` for the uncommitted new row.
    pub fn is_pending(&self) -> bool {
        self.id == PENDING_ROW_ID
    }

    pub fn current_data(&self) -> &T {
        self.validator.value()
    }

    /// Applies a partial update to the live record.
    pub fn patch_current_data(&mut self, patch: T::Patch) {
        self.validator.patch_value(patch);
    }

    pub fn replace_current_data(&mut self, value: T) {
        self.validator.set_value(value);
    }

    pub fn original_data(&self) -> Option<&T> {
        self.original_data.as_ref()
    }

    pub fn editing(&self) -> bool {
        self.validator.is_enabled()
    }

    pub fn set_editing(&mut self, editing: bool) {
        if editing {
            self.validator.enable();
        } else {
            self.validator.disable();
        }
    }

    /// Reports the validity of the live record.
    ///
    /// A disabled handle may report valid regardless of content, so a row that is not editing
    /// is re-enabled for the duration of the check. The editing state on return always equals
    /// the editing state on entry.
    pub fn is_valid(&mut self) -> bool {
        if self.validator.is_enabled() {
            return self.validator.is_valid();
        }
        let scope = EnabledScope::enter(&mut self.validator);
        let valid = scope.handle.is_valid();
        drop(scope);
        valid
    }

    /// The record this row contributes to the record output: the pre-edit snapshot while an
    /// edit is in progress, the live record otherwise. A snapshot kept after a confirm is
    /// history and does not feed the output.
    pub(crate) fn committed_data(&self) -> &T {
        match (&self.original_data, self.editing()) {
            (Some(original), true) => original,
            _ => self.current_data(),
        }
    }
}

impl<T: Record + core::fmt::Debug> core::fmt::Debug for Row<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Row")
            .field("id", &self.id)
            .field("editing", &self.editing())
            .field("current_data", self.current_data())
            .field("original_data", &self.original_data)
            .finish()
    }
}

/// Keeps a disabled handle enabled until dropped.
struct EnabledScope<'a, T: Record> {
    handle: &'a mut Box<dyn ValidationHandle<T>>,
}

impl<'a, T: Record> EnabledScope<'a, T> {
    fn enter(handle: &'a mut Box<dyn ValidationHandle<T>>) -> Self {
        handle.enable();
        Self { handle }
    }
}

impl<T: Record> Drop for EnabledScope<'_, T> {
    fn drop(&mut self) {
        self.handle.disable();
    }
}
