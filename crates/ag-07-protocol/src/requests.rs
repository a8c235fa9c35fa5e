//! # Request and Receipt Types
//!
//! The value objects crossing the inbound port. A [`PostLocator`] is the
//! full addressable identity of a post as clients hold it; receipts echo
//! back the derived record key plus the identifiers the caller could not
//! know before the commit (positions, sequence ids, poll indexes).

use ag_04_post_store::NestingLevel;
use serde::{Deserialize, Serialize};
use shared_types::{AccountId, AreaTag, RecordKey, SectionName};

/// Complete addressable identity of a post.
///
/// Everything here is client-known: the area and section the post lives
/// in, its nesting level, and the `(owner, position)` pair that makes it
/// unique. The record key is re-derived from these values, never looked
/// up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostLocator {
    pub area: AreaTag,
    pub section: SectionName,
    pub level: NestingLevel,
    pub owner: AccountId,
    pub position: u128,
}

/// Acknowledgement for operations that create or touch one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub key: RecordKey,
}

/// Acknowledgement for a newly created post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReceipt {
    pub key: RecordKey,
    pub level: NestingLevel,
    /// Family-local chronological id assigned at commit.
    pub sequence_id: u64,
    /// The author's ledger position consumed by this post; replies to it
    /// must quote this value as their parent back-reference.
    pub author_post_position: u128,
}

/// Acknowledgement for a newly created poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollReceipt {
    pub key: RecordKey,
    pub index: u128,
}

/// Acknowledgement for a newly created poll option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOptionReceipt {
    pub key: RecordKey,
    pub poll_index: u128,
    pub option_index: u8,
}
