use crate::RowId;

/// Errors returned by [`crate::DataSource`] operations.
///
/// A rejected confirm is not an error: `confirm_create`/`confirm_edit` return `Ok(false)` and
/// leave the row untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DataSourceError {
    /// The record shape cannot be determined: no records and no empty-record factory.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// No row carries the given id.
    #[error("row not found: {id}")]
    RowNotFound { id: RowId },

    /// A move would place the row outside the sequence.
    #[error("cannot move row {id} from index {from} to {to} (len {len})")]
    MoveOutOfBounds {
        id: RowId,
        from: usize,
        to: isize,
        len: usize,
    },
}

pub type Result<T, E = DataSourceError> = core::result::Result<T, E>;
