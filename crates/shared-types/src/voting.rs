//! # Vote Aggregator
//!
//! The single tally arithmetic shared by post votes, section-subject votes,
//! and poll-option votes.
//!
//! ## Rules
//!
//! - amount > 0: add amount to the up score, increment the up count by 1
//! - amount < 0: add |amount| to the down score, increment the down count by 1
//! - amount == 0: rejected as invalid input
//!
//! The net score is always recomputed from its components; it is never
//! stored. There is no voter de-duplication: the same identity may vote
//! repeatedly and each call accumulates further.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Aggregate vote state carried by every vote-accepting record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct VoteTally {
    /// Sum of all positive vote amounts.
    pub up_vote_score: u64,
    /// Number of positive votes applied.
    pub up_vote_count: u64,
    /// Sum of |amount| over all negative votes.
    pub down_vote_score: u64,
    /// Number of negative votes applied.
    pub down_vote_count: u64,
}

/// Vote arithmetic failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VoteError {
    /// Zero-amount votes are meaningless and rejected.
    #[error("vote amount must be non-zero")]
    ZeroAmount,

    /// A tally component would overflow its counter.
    #[error("vote tally overflow: {component}")]
    Overflow { component: &'static str },
}

impl VoteTally {
    /// Applies one signed vote to the tally.
    ///
    /// Checked arithmetic throughout: a tally that can no longer grow
    /// rejects the vote rather than wrapping.
    pub fn apply(&mut self, amount: i64) -> Result<(), VoteError> {
        if amount == 0 {
            return Err(VoteError::ZeroAmount);
        }

        if amount > 0 {
            self.up_vote_score = self
                .up_vote_score
                .checked_add(amount as u64)
                .ok_or(VoteError::Overflow {
                    component: "up_vote_score",
                })?;
            self.up_vote_count =
                self.up_vote_count
                    .checked_add(1)
                    .ok_or(VoteError::Overflow {
                        component: "up_vote_count",
                    })?;
        } else {
            self.down_vote_score = self
                .down_vote_score
                .checked_add(amount.unsigned_abs())
                .ok_or(VoteError::Overflow {
                    component: "down_vote_score",
                })?;
            self.down_vote_count =
                self.down_vote_count
                    .checked_add(1)
                    .ok_or(VoteError::Overflow {
                        component: "down_vote_count",
                    })?;
        }
        Ok(())
    }

    /// Net score: up score minus down score, recomputed on demand.
    #[must_use]
    pub fn net_score(&self) -> i128 {
        self.up_vote_score as i128 - self.down_vote_score as i128
    }
}
