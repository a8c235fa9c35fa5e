use shared_types::VoteError;
use thiserror::Error;

/// Post Store failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PostError {
    /// Message exceeds the stored field size.
    #[error("message too long: {len} bytes, max {max}")]
    MessageTooLong { len: usize, max: usize },

    /// Message must carry at least one byte.
    #[error("message is empty")]
    EmptyMessage,

    /// Replying below the configured nesting cap.
    #[error("nesting depth {attempted} exceeds cap {max}")]
    NestingTooDeep { attempted: u8, max: u8 },

    /// A reply was filed against a parent in a different section.
    #[error("parent post belongs to section {parent_section}, not {claimed_section}")]
    ParentSectionMismatch {
        parent_section: String,
        claimed_section: String,
    },

    /// Only the post owner may perform this mutation.
    #[error("caller {caller} does not own post by {owner}")]
    NotOwner { caller: String, owner: String },

    /// The family sequence counter is exhausted.
    #[error("sequence counter overflow for area {area}, level {level}")]
    SequenceOverflow { area: String, level: u8 },

    /// Vote arithmetic failed.
    #[error(transparent)]
    Vote(#[from] VoteError),
}
