//! # Author Ledger Record
//!
//! One ledger per author identity, shared across all content areas,
//! sections, and nesting depths that author posts in.

use serde::{Deserialize, Serialize};
use shared_types::AccountId;

use super::LedgerError;

/// Maximum byte length of a display name.
pub const MAX_DISPLAY_NAME_LEN: usize = 144;

/// Per-author ledger record.
///
/// ## Invariant
///
/// `post_and_reply_count` only increases, by exactly 1, each time this
/// author creates any post-kind record in any area. It never decreases,
/// even when posts are later deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorLedger {
    /// The author this ledger belongs to.
    pub author: AccountId,
    /// Next free post position; also the count of posts ever created.
    pub post_and_reply_count: u128,
    /// Optional custom display name shown instead of the address.
    pub display_name: String,
    /// Whether clients should render `display_name` instead of the address.
    pub use_custom_name: bool,
}

/// The result of claiming a post position: the position to use and the
/// ledger as it must be written back in the same atomic transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionClaim {
    pub position: u128,
    pub ledger: AuthorLedger,
}

impl AuthorLedger {
    /// A zeroed ledger for an author seen for the first time.
    #[must_use]
    pub fn new(author: AccountId) -> Self {
        Self {
            author,
            post_and_reply_count: 0,
            display_name: String::new(),
            use_custom_name: false,
        }
    }

    /// Claims the next post position.
    ///
    /// Returns the pre-increment counter value as the position and the
    /// ledger with the counter advanced by exactly 1. The caller must
    /// commit the returned ledger atomically with the post record it
    /// creates; a stale ledger read loses that commit race.
    pub fn claim_position(&self) -> Result<PositionClaim, LedgerError> {
        let position = self.post_and_reply_count;
        let next = position
            .checked_add(1)
            .ok_or_else(|| LedgerError::CounterOverflow {
                author: self.author.to_string(),
            })?;

        let mut ledger = self.clone();
        ledger.post_and_reply_count = next;
        Ok(PositionClaim { position, ledger })
    }

    /// Replaces the display name.
    pub fn set_display_name(&mut self, name: impl Into<String>) -> Result<(), LedgerError> {
        let name = name.into();
        if name.len() > MAX_DISPLAY_NAME_LEN {
            return Err(LedgerError::DisplayNameTooLong {
                len: name.len(),
                max: MAX_DISPLAY_NAME_LEN,
            });
        }
        self.display_name = name;
        Ok(())
    }

    /// Toggles whether the custom name is rendered.
    pub fn set_use_custom_name(&mut self, flag: bool) {
        self.use_custom_name = flag;
    }
}
