use alloc::boxed::Box;
use alloc::format;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::error::Result;
use crate::factory::{RowDescriptor, build_row};
use crate::ids::{index_from_row_id, renumber_all, row_id_from_index, update_row_ids};
use crate::options::EmptyRecordFactory;
use crate::subscribers::{SubscriptionId, Subscribers};
use crate::window::{RangeReporter, ViewRange, ViewerId, window};
use crate::{
    DataSourceError, DataSourceOptions, PENDING_ROW_ID, Record, Row, RowId, TableConfig,
    ValidatorService,
};

/// Source of the pending row's record.
enum EmptyRecord<T> {
    Factory(EmptyRecordFactory<T>),
    /// The emptied shape of the first initial record.
    Template(T),
}

impl<T: Clone> EmptyRecord<T> {
    fn make(&self) -> T {
        match self {
            Self::Factory(f) => f(),
            Self::Template(t) => t.clone(),
        }
    }
}

struct ViewerBinding<T: Record> {
    viewer: ViewerId,
    range: RangeReporter,
    sink: Box<dyn FnMut(&[Row<T>])>,
}

impl<T: Record> ViewerBinding<T> {
    fn deliver(&mut self, rows: &[Row<T>]) {
        (self.sink)(window(rows, self.range.current()));
    }
}

/// An editable table data source.
///
/// Owns the ordered rows and keeps their ids consistent through every create, confirm,
/// delete and move. Each change is pushed synchronously:
/// - on the row channel (plain row subscribers plus every connected viewer, windowed to the
///   viewer's latest range);
/// - on the record channel (the committed records as an `Arc<[T]>`) when committed data changed.
///
/// A row publication always precedes the record publication of the same change.
pub struct DataSource<T: Record> {
    options: DataSourceOptions<T>,
    empty_record: EmptyRecord<T>,
    rows: Vec<Row<T>>,
    data: Arc<[T]>,

    row_subscribers: Subscribers<[Row<T>]>,
    record_subscribers: Subscribers<Arc<[T]>>,
    viewers: Vec<ViewerBinding<T>>,

    batch_depth: usize,
    rows_pending: bool,
    records_pending: bool,
}

impl<T: Record> DataSource<T> {
    /// Builds a data source over `records`.
    ///
    /// Fails with [`DataSourceError::InvalidConfiguration`] when `records` is empty and the
    /// options carry no empty-record factory: the pending row's shape would be unknown.
    pub fn new(records: Arc<[T]>, options: DataSourceOptions<T>) -> Result<Self> {
        let empty_record = match (&options.empty_record, records.first()) {
            (Some(f), _) => EmptyRecord::Factory(Arc::clone(f)),
            (None, Some(first)) => EmptyRecord::Template(first.emptied()),
            (None, None) => {
                return Err(DataSourceError::InvalidConfiguration(
                    "cannot determine the record shape: no records and no empty-record factory",
                ));
            }
        };
        tdebug!(
            count = records.len(),
            prepend = options.config.prepend_new_elements,
            "DataSource::new"
        );

        let rows = build_rows(
            &records,
            options.validator_service.as_ref(),
            options.config.prepend_new_elements,
        );
        let source = Self {
            options,
            empty_record,
            rows,
            data: records,
            row_subscribers: Subscribers::new(),
            record_subscribers: Subscribers::new(),
            viewers: Vec::new(),
            batch_depth: 0,
            rows_pending: false,
            records_pending: false,
        };
        source.check_validator_fields();
        Ok(source)
    }

    pub fn config(&self) -> &TableConfig {
        &self.options.config
    }

    pub fn rows(&self) -> &[Row<T>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The collection last supplied through [`Self::update_datasource`] or last published on
    /// the record channel.
    pub fn data(&self) -> &Arc<[T]> {
        &self.data
    }

    /// Extracts the committed records from the current rows.
    pub fn records(&self) -> Arc<[T]> {
        extract_records(&self.rows)
    }

    pub fn get_row(&self, id: RowId) -> Option<&Row<T>> {
        let index = index_from_row_id(id, &self.rows)?;
        self.rows.get(index)
    }

    pub fn pending_row(&self) -> Option<&Row<T>> {
        self.rows.iter().find(|row| row.is_pending())
    }

    /// Checks a row's validity without changing its editing state.
    pub fn is_row_valid(&mut self, id: RowId) -> Result<bool> {
        let index = self.index_of(id)?;
        Ok(self.rows[index].is_valid())
    }

    /// Adds the pending row, unless one already exists.
    ///
    /// The row is inserted at `insert_at` (clamped to the current length) when given, otherwise
    /// at the front in prepend mode and at the end in append mode. Only the row channel
    /// publishes: a pending row is not data yet.
    pub fn create_new(&mut self, insert_at: Option<usize>) -> bool {
        if self.pending_row().is_some() {
            ttrace!("create_new: pending row already exists");
            return false;
        }

        let descriptor = RowDescriptor::from_service(
            PENDING_ROW_ID,
            true,
            self.empty_record.make(),
            self.options.validator_service.as_ref(),
        );
        let index = match insert_at {
            Some(index) => index.min(self.rows.len()),
            None if self.options.config.prepend_new_elements => 0,
            None => self.rows.len(),
        };
        tdebug!(index, "create_new");
        self.rows.insert(index, build_row(descriptor));
        self.publish_rows();
        true
    }

    /// Commits a created row.
    ///
    /// Returns `Ok(false)` and leaves the row untouched if it is invalid. On success the row
    /// takes id `len - 1`, stops editing, and both channels publish.
    pub fn confirm_create(&mut self, id: RowId) -> Result<bool> {
        let index = self.index_of(id)?;
        let count = self.rows.len();
        let keep = self.options.config.keep_original_data_after_confirm;

        let row = &mut self.rows[index];
        if !row.is_valid() {
            tdebug!(id, "confirm_create: rejected by validator");
            return Ok(false);
        }
        row.id = count.saturating_sub(1) as RowId;
        if keep {
            row.original_data = Some(row.current_data().clone());
        }
        row.set_editing(false);
        // Only moves ids when the row was inserted away from its mode's natural end.
        renumber_all(&mut self.rows, self.options.config.prepend_new_elements);

        tdebug!(index, "confirm_create");
        self.publish_rows();
        self.publish_records();
        Ok(true)
    }

    /// Commits an edited row.
    ///
    /// Returns `Ok(false)` and leaves the row untouched if it is invalid. The pre-edit snapshot
    /// is cleared, or kept in `original_data` when the keep flag is set.
    pub fn confirm_edit(&mut self, id: RowId) -> Result<bool> {
        let index = self.index_of(id)?;
        let keep = self.options.config.keep_original_data_after_confirm;

        let row = &mut self.rows[index];
        if !row.is_valid() {
            tdebug!(id, "confirm_edit: rejected by validator");
            return Ok(false);
        }
        // The keep flag retains the snapshot taken by `begin_edit`.
        if !keep {
            row.original_data = None;
        }
        row.set_editing(false);

        tdebug!(id, index, "confirm_edit");
        self.publish_rows();
        self.publish_records();
        Ok(true)
    }

    /// Puts a committed row into editing state, snapshotting its current record.
    ///
    /// Each edit takes a fresh snapshot, replacing one kept from an earlier confirm, so the
    /// snapshot always holds the value the current edit started from. Returns `Ok(false)` if the
    /// row is already editing.
    pub fn begin_edit(&mut self, id: RowId) -> Result<bool> {
        let index = self.index_of(id)?;
        let row = &mut self.rows[index];
        if row.editing() {
            return Ok(false);
        }
        row.original_data = Some(row.current_data().clone());
        row.set_editing(true);
        self.publish_rows();
        Ok(true)
    }

    /// Applies a partial update to an editing row.
    ///
    /// Returns `Ok(false)` without touching the row when it is not editing.
    pub fn patch_row(&mut self, id: RowId, patch: T::Patch) -> Result<bool> {
        let index = self.index_of(id)?;
        let row = &mut self.rows[index];
        if !row.editing() {
            return Ok(false);
        }
        row.patch_current_data(patch);
        self.publish_rows();
        Ok(true)
    }

    /// Abandons an edit.
    ///
    /// The pending row is deleted. Any other row gets its snapshot back and stops editing.
    pub fn cancel_edit(&mut self, id: RowId) -> Result<()> {
        let index = self.index_of(id)?;
        if self.rows[index].is_pending() {
            return self.delete(id);
        }

        let keep = self.options.config.keep_original_data_after_confirm;
        let row = &mut self.rows[index];
        if let Some(original) = row.original_data.clone() {
            row.replace_current_data(original);
        }
        if !keep {
            row.original_data = None;
        }
        row.set_editing(false);
        self.publish_rows();
        Ok(())
    }

    /// Removes a row.
    ///
    /// The record channel publishes unless the removed row was the pending row.
    pub fn delete(&mut self, id: RowId) -> Result<()> {
        let index = self.index_of(id)?;
        let removed = self.rows.remove(index);
        update_row_ids(index, &mut self.rows, self.options.config.prepend_new_elements);

        tdebug!(id, index, "delete");
        self.publish_rows();
        if !removed.is_pending() {
            self.publish_records();
        }
        Ok(())
    }

    /// Moves a row by `direction` positions (negative is toward the front).
    ///
    /// `direction == 0` does nothing, not even publish. A target outside the sequence fails with
    /// [`DataSourceError::MoveOutOfBounds`].
    pub fn move_row(&mut self, id: RowId, direction: isize) -> Result<()> {
        if direction == 0 {
            return Ok(());
        }
        let index = self.index_of(id)?;
        let len = self.rows.len();
        // Saturates, so an overflowing direction lands outside `0..len`.
        let target = (index as isize).saturating_add(direction);
        if target < 0 || target >= len as isize {
            return Err(DataSourceError::MoveOutOfBounds {
                id,
                from: index,
                to: target,
                len,
            });
        }

        let row = self.rows.remove(index);
        let pending = row.is_pending();
        self.rows.insert(target as usize, row);
        renumber_all(&mut self.rows, self.options.config.prepend_new_elements);

        tdebug!(id, from = index, to = target, "move_row");
        self.publish_rows();
        if !pending {
            self.publish_records();
        }
        Ok(())
    }

    /// Replaces the backing records.
    ///
    /// Passing the collection currently held (same `Arc`) is a no-op and returns `false`; the
    /// comparison is by pointer, not by content. Otherwise every row is rebuilt (not editing,
    /// pending row dropped), the row channel publishes, and the record channel publishes
    /// `records` itself when `emit_event` is set.
    pub fn update_datasource(&mut self, records: Arc<[T]>, emit_event: bool) -> bool {
        if Arc::ptr_eq(&self.data, &records) {
            ttrace!("update_datasource: same collection");
            return false;
        }
        tdebug!(count = records.len(), emit_event, "update_datasource");

        self.rows = build_rows(
            &records,
            self.options.validator_service.as_ref(),
            self.options.config.prepend_new_elements,
        );
        self.data = records;
        self.publish_rows();
        if emit_event {
            self.publish_data();
        }
        true
    }

    /// Batches multiple mutations into at most one publication per channel.
    ///
    /// Row subscribers and viewers see the final sequence once, followed by one record
    /// publication if any mutation inside `f` changed committed data.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        self.batch_depth = self.batch_depth.saturating_add(1);

        f(self);

        debug_assert!(self.batch_depth > 0, "batch_depth underflow");
        self.batch_depth = self.batch_depth.saturating_sub(1);
        if self.batch_depth > 0 {
            return;
        }
        if core::mem::take(&mut self.rows_pending) {
            self.deliver_rows();
        }
        if core::mem::take(&mut self.records_pending) {
            self.deliver_records();
        }
    }

    /// Subscribes to every row publication (unwindowed).
    pub fn subscribe_rows(&mut self, f: impl FnMut(&[Row<T>]) + 'static) -> SubscriptionId {
        self.row_subscribers.subscribe(f)
    }

    pub fn unsubscribe_rows(&mut self, id: SubscriptionId) -> bool {
        self.row_subscribers.unsubscribe(id)
    }

    /// Subscribes to record publications.
    ///
    /// Feeding a received collection back through [`Self::update_datasource`] is a no-op.
    pub fn subscribe_records(&mut self, f: impl FnMut(&Arc<[T]>) + 'static) -> SubscriptionId {
        self.record_subscribers.subscribe(f)
    }

    pub fn unsubscribe_records(&mut self, id: SubscriptionId) -> bool {
        self.record_subscribers.unsubscribe(id)
    }

    /// Attaches a viewer.
    ///
    /// The viewer starts with [`ViewRange::ALL`] and immediately receives the current window;
    /// afterwards `sink` receives a window on every row publication. The returned reporter is
    /// the viewer's range channel: the latest reported range is used at each delivery.
    /// Connecting an id that is already attached replaces its binding.
    pub fn connect(
        &mut self,
        viewer: ViewerId,
        sink: impl FnMut(&[Row<T>]) + 'static,
    ) -> RangeReporter {
        self.viewers.retain(|binding| binding.viewer != viewer);
        let range = RangeReporter::new(ViewRange::ALL);
        let mut binding = ViewerBinding {
            viewer,
            range: range.clone(),
            sink: Box::new(sink),
        };
        tdebug!(viewer = viewer.0, "connect");
        binding.deliver(&self.rows);
        self.viewers.push(binding);
        range
    }

    /// Detaches a viewer. Returns `false` if it was not attached.
    pub fn disconnect(&mut self, viewer: ViewerId) -> bool {
        let before = self.viewers.len();
        self.viewers.retain(|binding| binding.viewer != viewer);
        let removed = self.viewers.len() != before;
        if removed {
            tdebug!(viewer = viewer.0, "disconnect");
        }
        removed
    }

    /// Reports a viewer's range and re-delivers its window right away.
    ///
    /// Returns `false` if the viewer is not attached.
    pub fn report_range(&mut self, viewer: ViewerId, range: ViewRange) -> bool {
        let Some(binding) = self.viewers.iter_mut().find(|b| b.viewer == viewer) else {
            return false;
        };
        ttrace!(viewer = viewer.0, start = range.start, end = range.end, "report_range");
        binding.range.report(range);
        binding.deliver(&self.rows);
        true
    }

    pub fn viewer_range(&self, viewer: ViewerId) -> Option<ViewRange> {
        self.viewers
            .iter()
            .find(|b| b.viewer == viewer)
            .map(|b| b.range.current())
    }

    pub fn viewer_count(&self) -> usize {
        self.viewers.len()
    }

    fn index_of(&self, id: RowId) -> Result<usize> {
        index_from_row_id(id, &self.rows).ok_or(DataSourceError::RowNotFound { id })
    }

    fn publish_rows(&mut self) {
        if self.batch_depth > 0 {
            self.rows_pending = true;
            return;
        }
        self.deliver_rows();
    }

    fn deliver_rows(&mut self) {
        self.row_subscribers.publish(&self.rows);
        for binding in self.viewers.iter_mut() {
            binding.deliver(&self.rows);
        }
    }

    /// Re-extracts the committed records and publishes them.
    fn publish_records(&mut self) {
        self.data = extract_records(&self.rows);
        self.publish_data();
    }

    /// Publishes the held collection as-is.
    fn publish_data(&mut self) {
        if self.batch_depth > 0 {
            self.records_pending = true;
            return;
        }
        self.deliver_records();
    }

    fn deliver_records(&mut self) {
        self.record_subscribers.publish(&self.data);
    }

    /// Warns when the validation handle's declared fields differ from the record's fields.
    fn check_validator_fields(&self) {
        let sample = match self.rows.first() {
            Some(row) => row.current_data().clone(),
            None => self.empty_record.make(),
        };
        let mut record_fields = sample.field_names();
        let mut handle_fields = self
            .options
            .validator_service
            .row_validator(sample)
            .field_names();
        if handle_fields.is_empty() {
            return;
        }
        record_fields.sort();
        handle_fields.sort();
        if record_fields != handle_fields {
            self.log_error(&format!(
                "validator fields {handle_fields:?} do not match record fields {record_fields:?}"
            ));
        }
    }

    fn log_error(&self, message: &str) {
        if self.options.config.suppress_errors {
            return;
        }
        match &self.options.on_error {
            Some(cb) => cb(message),
            None => {
                twarn!("{}", message);
            }
        }
    }
}

impl<T: Record> core::fmt::Debug for DataSource<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DataSource")
            .field("options", &self.options)
            .field("len", &self.rows.len())
            .field("viewers", &self.viewers.len())
            .field("row_subscribers", &self.row_subscribers)
            .field("record_subscribers", &self.record_subscribers)
            .finish_non_exhaustive()
    }
}

fn build_rows<T: Record>(
    records: &[T],
    service: &dyn ValidatorService<T>,
    prepend: bool,
) -> Vec<Row<T>> {
    let count = records.len();
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            build_row(RowDescriptor::from_service(
                row_id_from_index(i, count, prepend),
                false,
                record.clone(),
                service,
            ))
        })
        .collect()
}

fn extract_records<T: Record>(rows: &[Row<T>]) -> Arc<[T]> {
    rows.iter()
        .filter(|row| !row.is_pending())
        .map(|row| row.committed_data().clone())
        .collect()
}
