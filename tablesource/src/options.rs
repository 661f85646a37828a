use alloc::sync::Arc;

use crate::{NoopValidatorService, Record, ValidatorService};

/// Produces an empty record for the pending row.
pub type EmptyRecordFactory<T> = Arc<dyn Fn() -> T>;

/// Receives diagnostic messages (see [`TableConfig::suppress_errors`]).
pub type ErrorCallback = Arc<dyn Fn(&str)>;

/// Behavior flags, fixed when the data source is built.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TableConfig {
    /// New rows go to the front and ids count down from the front (id 0 is the last row).
    pub prepend_new_elements: bool,
    /// Silences diagnostics.
    pub suppress_errors: bool,
    /// Rows keep an `original_data` snapshot after a successful confirm.
    pub keep_original_data_after_confirm: bool,
}

/// Configuration for [`crate::DataSource`].
///
/// Collaborators are stored in `Arc`s, so cloning the options is cheap.
pub struct DataSourceOptions<T: Record> {
    pub config: TableConfig,

    /// Builds the record of a new pending row.
    ///
    /// When unset, the first initial record's [`Record::emptied`] shape is used; building a data
    /// source from no records then fails.
    pub empty_record: Option<EmptyRecordFactory<T>>,

    pub validator_service: Arc<dyn ValidatorService<T>>,

    /// Optional diagnostic sink. When unset, diagnostics go to `tracing` (with
    /// `feature = "tracing"`).
    pub on_error: Option<ErrorCallback>,
}

impl<T: Record> Clone for DataSourceOptions<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            empty_record: self.empty_record.clone(),
            validator_service: Arc::clone(&self.validator_service),
            on_error: self.on_error.clone(),
        }
    }
}

impl<T: Record + 'static> Default for DataSourceOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record + 'static> DataSourceOptions<T> {
    /// Default options: all flags off, always-valid rows, no empty-record factory.
    pub fn new() -> Self {
        Self {
            config: TableConfig::default(),
            empty_record: None,
            validator_service: Arc::new(NoopValidatorService),
            on_error: None,
        }
    }
}

impl<T: Record> DataSourceOptions<T> {
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_prepend_new_elements(mut self, prepend: bool) -> Self {
        self.config.prepend_new_elements = prepend;
        self
    }

    pub fn with_suppress_errors(mut self, suppress: bool) -> Self {
        self.config.suppress_errors = suppress;
        self
    }

    pub fn with_keep_original_data_after_confirm(mut self, keep: bool) -> Self {
        self.config.keep_original_data_after_confirm = keep;
        self
    }

    pub fn with_empty_record(mut self, f: impl Fn() -> T + 'static) -> Self {
        self.empty_record = Some(Arc::new(f));
        self
    }

    pub fn with_validator_service(mut self, service: impl ValidatorService<T> + 'static) -> Self {
        self.validator_service = Arc::new(service);
        self
    }

    pub fn with_on_error(mut self, on_error: Option<impl Fn(&str) + 'static>) -> Self {
        self.on_error = on_error.map(|f| Arc::new(f) as _);
        self
    }
}

impl<T: Record> core::fmt::Debug for DataSourceOptions<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DataSourceOptions")
            .field("config", &self.config)
            .field("empty_record", &self.empty_record.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish_non_exhaustive()
    }
}
