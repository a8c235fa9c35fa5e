//! # Error Taxonomy
//!
//! The protocol-wide failure categories. Every operation fails
//! synchronously with one of these; a failed operation leaves all records
//! byte-for-byte unchanged.

use thiserror::Error;

/// Failure categories reported to callers of the protocol surface.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// An address did not resolve: missing section, parent, ledger, etc.
    #[error("{entity} not found at key {key}")]
    NotFound { entity: &'static str, key: String },

    /// A create targeted a key that is already occupied.
    #[error("{entity} already exists at key {key}")]
    AlreadyExists { entity: &'static str, key: String },

    /// A precondition was unmet: disabled section, stale counter race,
    /// inactive poll, unregistered weighting asset.
    #[error("precondition failed: {reason}")]
    PreconditionFailed { reason: String },

    /// Caller is not allowed to alter the targeted record.
    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    /// Malformed input: oversized text, zero-amount vote, bad name.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Storage layer failure (lock poisoning, codec failure).
    #[error("storage error: {0}")]
    Storage(String),
}

impl ProtocolError {
    /// Shorthand for a not-found failure on a derived key.
    #[must_use]
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Shorthand for a duplicate-create failure on a derived key.
    #[must_use]
    pub fn already_exists(entity: &'static str, key: impl ToString) -> Self {
        Self::AlreadyExists {
            entity,
            key: key.to_string(),
        }
    }
}
