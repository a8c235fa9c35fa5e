use thiserror::Error;

/// Author Ledger failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Display name exceeds the stored field size.
    #[error("display name too long: {len} bytes, max {max}")]
    DisplayNameTooLong { len: usize, max: usize },

    /// The position counter is exhausted. With a u128 counter this is
    /// unreachable in practice, but the arithmetic stays checked.
    #[error("post position counter overflow for author {author}")]
    CounterOverflow { author: String },
}
