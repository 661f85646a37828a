//! An editable, windowed table data source.
//!
//! The data source sits between an in-memory collection of records and a grid UI. It wraps
//! each record into a [`Row`] carrying identity, editing state and validity, and pushes the row
//! sequence to any number of viewers, each windowed to the index range it reports.
//!
//! The engine keeps several invariants through every operation:
//! - committed row ids are contiguous (`0..n`, counted front to back or back to front);
//! - at most one pending row (id [`PENDING_ROW_ID`]) exists;
//! - a created or edited row only commits while its validation handle reports valid.
//!
//! It is UI-agnostic. A UI layer is expected to provide:
//! - a [`ValidatorService`] producing per-row validation handles (or use the defaults)
//! - the visible range of each viewer
//! - persistence of the records published on the record channel, if any
//!
//! For viewport-driven range reporting and row anchoring, see the `tablesource-adapter` crate.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod factory;
mod ids;
mod options;
mod record;
mod row;
mod source;
mod subscribers;
mod validator;
mod window;


pub use error::{DataSourceError, Result};
pub use factory::{RowDescriptor, build_row};
pub use ids::{index_from_row_id, renumber_all, row_id_from_index, update_row_ids};
pub use options::{DataSourceOptions, EmptyRecordFactory, ErrorCallback, TableConfig};
pub use record::{FieldRecord, FieldValue, Record};
pub use row::{PENDING_ROW_ID, Row, RowId};
pub use source::DataSource;
pub use subscribers::{Subscribers, SubscriptionId};
pub use validator::{
    NoopValidatorService, PredicateValidatorService, RecordPredicate, ValidationHandle,
    ValidatorService,
};
pub use window::{RangeReporter, ViewRange, ViewerId, window};
