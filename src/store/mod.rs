mod error;

use std::fmt;

use log::{debug, warn};
use parking_lot::RwLock;

use crate::types::{RuleSet, Schema};

pub use error::{ListError, StoreError};

/// A record type that can be stored and filtered.
pub trait Record: Sized + 'static {
    /// Composite identity key. No two stored records share one.
    type Key: PartialEq + fmt::Display;

    /// A leading part of [`Record::Key`], used for "latest by prefix" lookups.
    type KeyPrefix: ?Sized;

    /// The field descriptor used to resolve rules against this type.
    fn schema() -> &'static Schema<Self>;

    fn key(&self) -> Self::Key;

    fn has_key_prefix(&self, prefix: &Self::KeyPrefix) -> bool;
}

/// In-memory, append-only record store.
///
/// Records keep insertion order. Reads may run concurrently; [`Store::add`]
/// takes an exclusive lock covering both the uniqueness check and the append.
#[derive(Debug)]
pub struct Store<R> {
    records: RwLock<Vec<R>>,
}

impl<R> Default for Store<R> {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<R: Record + Clone> Store<R> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    ///
    /// # Errors
    ///
    /// [`StoreError::DuplicateIdentity`] if a record with the same key is
    /// already stored.
    pub fn add(&self, record: R) -> Result<(), StoreError> {
        let key = record.key();
        let mut records = self.records.write();
        if records.iter().any(|r| r.key() == key) {
            warn!("rejected duplicate record '{key}'");
            return Err(StoreError::DuplicateIdentity {
                key: key.to_string(),
            });
        }
        records.push(record);
        debug!("added record '{key}' ({} stored)", records.len());
        Ok(())
    }

    /// The record with exactly this key, if any.
    #[must_use]
    pub fn get_by_key(&self, key: &R::Key) -> Option<R> {
        self.records.read().iter().find(|r| r.key() == *key).cloned()
    }

    /// The most recently added record whose key starts with `prefix`.
    ///
    /// This is insertion order, not key order: if version `0.0.2` was added
    /// before `0.0.1`, the latter is returned.
    #[must_use]
    pub fn get_by_key_prefix(&self, prefix: &R::KeyPrefix) -> Option<R> {
        self.records
            .read()
            .iter()
            .rev()
            .find(|r| r.has_key_prefix(prefix))
            .cloned()
    }

    /// Every record matching `rules`, in insertion order. An empty rule set
    /// lists everything.
    ///
    /// # Errors
    ///
    /// On the first evaluation error, a [`ListError`] wrapping
    /// [`StoreError::FilterEvaluationFailed`] and the records matched so far.
    pub fn list(&self, rules: &RuleSet) -> Result<Vec<R>, ListError<R>> {
        let records = self.records.read();
        let mut matched = Vec::new();
        for record in records.iter() {
            match rules.matches(record) {
                Ok(true) => matched.push(record.clone()),
                Ok(false) => {}
                Err(err) => {
                    warn!("filter '{rules}' failed on record '{}': {err}", record.key());
                    return Err(ListError::new(
                        matched,
                        StoreError::FilterEvaluationFailed(err),
                    ));
                }
            }
        }
        debug!(
            "filter '{rules}' matched {} of {} records",
            matched.len(),
            records.len()
        );
        Ok(matched)
    }

    /// A snapshot of every stored record.
    #[must_use]
    pub fn records(&self) -> Vec<R> {
        self.records.read().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
