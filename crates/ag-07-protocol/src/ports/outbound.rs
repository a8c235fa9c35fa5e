//! # Driven Ports (Storage - Outbound)
//!
//! The record store abstraction the protocol service writes through.
//!
//! Records are opaque byte blobs with a monotonically increasing version.
//! A commit carries the versions (or absence) the service observed while
//! preparing the transition; the store validates every expectation and
//! applies every write inside one critical section, or applies nothing.
//! This is the compare-and-swap-or-abort seam that keeps concurrent
//! writers from losing updates on the same record.

use ag_04_post_store::NestingLevel;
use shared_types::{AccountId, AreaTag, RecordKey, SectionName};
use thiserror::Error;

/// A stored record with its current version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned {
    /// Starts at 1 on first write; bumps by 1 on every overwrite.
    pub version: u64,
    pub bytes: Vec<u8>,
}

/// What the service observed about a record while preparing a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// The record must not exist at commit time.
    Absent,
    /// The record must still carry exactly this version.
    Version(u64),
}

/// A single keyed write inside a transition.
#[derive(Debug, Clone)]
pub struct RecordWrite {
    pub key: RecordKey,
    pub op: WriteOp,
}

/// Write operations. Deletion exists only for registry-style records
/// (fee assets); thread records are never removed.
#[derive(Debug, Clone)]
pub enum WriteOp {
    Put(Vec<u8>),
    Delete,
}

/// Secondary index buckets for the query paths.
///
/// Finding a record never requires enumerating all records of a kind;
/// index entries are appended atomically with the commit that creates
/// the record they point to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexKey {
    /// All posts of one (area, level) family, in sequence order.
    AreaPosts { area: AreaTag, level: NestingLevel },
    /// All posts of one family within one section.
    SectionPosts {
        area: AreaTag,
        level: NestingLevel,
        section: SectionName,
    },
    /// All posts ever created by one author, across areas and levels.
    AuthorPosts { author: AccountId },
}

/// One atomic, all-or-nothing unit of work.
#[derive(Debug, Clone, Default)]
pub struct StateTransition {
    pub expectations: Vec<(RecordKey, Expectation)>,
    pub writes: Vec<RecordWrite>,
    pub index_appends: Vec<(IndexKey, RecordKey)>,
}

impl StateTransition {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_absent(&mut self, key: RecordKey) -> &mut Self {
        self.expectations.push((key, Expectation::Absent));
        self
    }

    pub fn expect_version(&mut self, key: RecordKey, version: u64) -> &mut Self {
        self.expectations.push((key, Expectation::Version(version)));
        self
    }

    pub fn put(&mut self, key: RecordKey, bytes: Vec<u8>) -> &mut Self {
        self.writes.push(RecordWrite {
            key,
            op: WriteOp::Put(bytes),
        });
        self
    }

    pub fn delete(&mut self, key: RecordKey) -> &mut Self {
        self.writes.push(RecordWrite {
            key,
            op: WriteOp::Delete,
        });
        self
    }

    pub fn append_index(&mut self, index: IndexKey, key: RecordKey) -> &mut Self {
        self.index_appends.push((index, key));
        self
    }
}

/// Plain storage failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A lock guarding the store was poisoned.
    #[error("store lock poisoned")]
    LockPoisoned,

    /// Backend failure (I/O, codec).
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Commit rejections. A rejected commit has applied nothing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommitError {
    /// Another writer got there first; the observed version is stale.
    #[error("version mismatch on {key}: expected {expected}, found {actual:?}")]
    VersionMismatch {
        key: RecordKey,
        expected: u64,
        actual: Option<u64>,
    },

    /// A record expected absent already exists.
    #[error("record unexpectedly present at {key}")]
    UnexpectedlyPresent { key: RecordKey },

    /// A record expected at some version no longer exists.
    #[error("record missing at {key}")]
    Missing { key: RecordKey },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Durable keyed storage with atomic transitions.
///
/// Implementations must validate every expectation and apply every write
/// of a transition under one critical section per commit.
pub trait RecordStore: Send + Sync {
    fn get(&self, key: &RecordKey) -> Result<Option<Versioned>, StoreError>;

    fn commit(&self, transition: StateTransition) -> Result<(), CommitError>;

    /// Record keys appended to one index bucket, oldest first.
    fn scan_index(&self, index: &IndexKey) -> Result<Vec<RecordKey>, StoreError>;
}
