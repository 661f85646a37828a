use alloc::boxed::Box;

use crate::{Record, Row, RowId, ValidationHandle};

/// Everything needed to build a [`Row`].
///
/// The handle must already hold the row's record; the factory only wires identity and editing
/// state onto it.
pub struct RowDescriptor<T: Record> {
    pub id: RowId,
    pub editing: bool,
    pub validator: Box<dyn ValidationHandle<T>>,
}

impl<T: Record> RowDescriptor<T> {
    /// Builds a descriptor whose handle is obtained from `service` and seeded with `data`.
    pub fn from_service(
        id: RowId,
        editing: bool,
        data: T,
        service: &dyn crate::ValidatorService<T>,
    ) -> Self {
        Self {
            id,
            editing,
            validator: service.row_validator(data),
        }
    }
}

pub fn build_row<T: Record>(descriptor: RowDescriptor<T>) -> Row<T> {
    Row::new(descriptor.id, descriptor.editing, descriptor.validator)
}

impl<T: Record> From<RowDescriptor<T>> for Row<T> {
    fn from(descriptor: RowDescriptor<T>) -> Self {
        build_row(descriptor)
    }
}
