use std::fmt;

use thiserror::Error;

use crate::FilterError;

/// Errors returned by [`Store`](super::Store) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record '{key}' already exists")]
    DuplicateIdentity { key: String },

    #[error("error occurred while filtering records: {0}")]
    FilterEvaluationFailed(#[source] FilterError),
}

/// A failed [`Store::list`](super::Store::list), carrying the records that
/// had matched before the failure.
pub struct ListError<R> {
    partial: Vec<R>,
    error: StoreError,
}

impl<R> ListError<R> {
    pub(crate) fn new(partial: Vec<R>, error: StoreError) -> Self {
        Self { partial, error }
    }

    /// Records that matched before evaluation failed, in insertion order.
    #[must_use]
    pub fn partial(&self) -> &[R] {
        &self.partial
    }

    #[must_use]
    pub fn error(&self) -> &StoreError {
        &self.error
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<R>, StoreError) {
        (self.partial, self.error)
    }
}

impl<R> From<ListError<R>> for StoreError {
    fn from(err: ListError<R>) -> Self {
        err.error
    }
}

impl<R> fmt::Debug for ListError<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListError")
            .field("partial", &self.partial.len())
            .field("error", &self.error)
            .finish()
    }
}

impl<R> fmt::Display for ListError<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl<R> std::error::Error for ListError<R> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.error)
    }
}
