use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::Record;

/// Per-row validation state: the row's live value, its enabled flag, and its validity.
///
/// Implementations usually wrap a form/field model from a UI toolkit. A disabled handle is
/// frozen: callers must not patch it, and many toolkits report a disabled handle as valid no
/// matter what it holds (which is why [`crate::Row::is_valid`] re-enables it before asking).
pub trait ValidationHandle<T: Record> {
    fn value(&self) -> &T;

    fn set_value(&mut self, value: T);

    fn patch_value(&mut self, patch: T::Patch);

    fn enable(&mut self);

    fn disable(&mut self);

    fn is_enabled(&self) -> bool;

    fn is_valid(&self) -> bool;

    /// Names of the fields this handle validates. Empty when the handle does not declare any.
    fn field_names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Produces a fresh [`ValidationHandle`] for every row the data source builds.
pub trait ValidatorService<T: Record> {
    fn row_validator(&self, initial: T) -> Box<dyn ValidationHandle<T>>;
}

/// A validator service with no fields whose handles are always valid.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopValidatorService;

impl<T: Record + 'static> ValidatorService<T> for NoopValidatorService {
    fn row_validator(&self, initial: T) -> Box<dyn ValidationHandle<T>> {
        Box::new(NoopHandle {
            value: initial,
            enabled: true,
        })
    }
}

#[derive(Clone, Debug)]
struct NoopHandle<T> {
    value: T,
    enabled: bool,
}

impl<T: Record> ValidationHandle<T> for NoopHandle<T> {
    fn value(&self) -> &T {
        &self.value
    }

    fn set_value(&mut self, value: T) {
        self.value = value;
    }

    fn patch_value(&mut self, patch: T::Patch) {
        self.value.apply_patch(patch);
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_valid(&self) -> bool {
        true
    }
}

/// A validity predicate shared by every handle of a [`PredicateValidatorService`].
pub type RecordPredicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// A validator service backed by a predicate over the whole record.
///
/// Handles behave like typical form controls: while disabled they report valid regardless of
/// their value.
pub struct PredicateValidatorService<T> {
    predicate: RecordPredicate<T>,
    fields: Vec<String>,
}

impl<T> PredicateValidatorService<T> {
    pub fn new(predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Arc::new(predicate),
            fields: Vec::new(),
        }
    }

    /// Declares the field names handles report through [`ValidationHandle::field_names`].
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

impl<T> Clone for PredicateValidatorService<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
            fields: self.fields.clone(),
        }
    }
}

impl<T> core::fmt::Debug for PredicateValidatorService<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PredicateValidatorService")
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl<T: Record + 'static> ValidatorService<T> for PredicateValidatorService<T> {
    fn row_validator(&self, initial: T) -> Box<dyn ValidationHandle<T>> {
        Box::new(PredicateHandle {
            value: initial,
            enabled: true,
            predicate: Arc::clone(&self.predicate),
            fields: self.fields.clone(),
        })
    }
}

struct PredicateHandle<T> {
    value: T,
    enabled: bool,
    predicate: RecordPredicate<T>,
    fields: Vec<String>,
}

impl<T: Record> ValidationHandle<T> for PredicateHandle<T> {
    fn value(&self) -> &T {
        &self.value
    }

    fn set_value(&mut self, value: T) {
        self.value = value;
    }

    fn patch_value(&mut self, patch: T::Patch) {
        self.value.apply_patch(patch);
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_valid(&self) -> bool {
        !self.enabled || (self.predicate)(&self.value)
    }

    fn field_names(&self) -> Vec<String> {
        self.fields.clone()
    }
}
