//! # In-Memory Record Store
//!
//! `RwLock`-backed implementation of [`RecordStore`] for tests and
//! single-process deployments. One write lock spans expectation checks
//! and writes, which gives commits their all-or-nothing guarantee.

use std::collections::HashMap;
use std::sync::RwLock;

use shared_types::RecordKey;

use crate::ports::outbound::{
    CommitError, Expectation, IndexKey, RecordStore, StateTransition, StoreError, Versioned,
    WriteOp,
};

#[derive(Debug, Default)]
struct StoreInner {
    /// key -> (bytes, version). Versions start at 1.
    records: HashMap<RecordKey, (Vec<u8>, u64)>,
    indexes: HashMap<IndexKey, Vec<RecordKey>>,
}

/// Versioned keyed storage held entirely in process memory.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records. Test helper.
    pub fn record_count(&self) -> Result<usize, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(inner.records.len())
    }
}

impl RecordStore for InMemoryRecordStore {
    fn get(&self, key: &RecordKey) -> Result<Option<Versioned>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(inner.records.get(key).map(|(bytes, version)| Versioned {
            version: *version,
            bytes: bytes.clone(),
        }))
    }

    fn commit(&self, transition: StateTransition) -> Result<(), CommitError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;

        // Validate every expectation before touching anything.
        for (key, expectation) in &transition.expectations {
            let current = inner.records.get(key).map(|(_, v)| *v);
            match (expectation, current) {
                (Expectation::Absent, None) => {}
                (Expectation::Absent, Some(_)) => {
                    return Err(CommitError::UnexpectedlyPresent { key: *key });
                }
                (Expectation::Version(expected), Some(actual)) if actual == *expected => {}
                (Expectation::Version(expected), actual) => {
                    return Err(CommitError::VersionMismatch {
                        key: *key,
                        expected: *expected,
                        actual,
                    });
                }
            }
        }

        for write in transition.writes {
            match write.op {
                WriteOp::Put(bytes) => {
                    let next = inner.records.get(&write.key).map_or(1, |(_, v)| v + 1);
                    inner.records.insert(write.key, (bytes, next));
                }
                WriteOp::Delete => {
                    inner.records.remove(&write.key);
                }
            }
        }

        for (index, key) in transition.index_appends {
            inner.indexes.entry(index).or_default().push(key);
        }

        Ok(())
    }

    fn scan_index(&self, index: &IndexKey) -> Result<Vec<RecordKey>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(inner.indexes.get(index).cloned().unwrap_or_default())
    }
}
