//! # Area Board
//!
//! One record per content area holding the family-local sequence counters
//! for every nesting level. Created once when the area is initialized;
//! the counters supply `sequence_id` values for chronological enumeration.

use serde::{Deserialize, Serialize};
use shared_types::AreaTag;

use super::{NestingLevel, PostError};

/// Per-area sequence counters, one per nesting-level family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaBoard {
    pub area: AreaTag,
    /// Number of posts ever created per family, indexed by level tag.
    /// The next post in a family gets `count + 1` as its sequence id.
    pub family_counts: [u64; 4],
}

/// A claimed sequence id plus the board as it must be written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceClaim {
    pub sequence_id: u64,
    pub board: AreaBoard,
}

impl AreaBoard {
    /// A freshly initialized area with no posts in any family.
    #[must_use]
    pub fn new(area: AreaTag) -> Self {
        Self {
            area,
            family_counts: [0; 4],
        }
    }

    /// Number of posts ever created in one family.
    #[must_use]
    pub fn family_count(&self, level: NestingLevel) -> u64 {
        self.family_counts[level.tag() as usize]
    }

    /// Claims the next sequence id for a family.
    ///
    /// Sequence ids start at 1 and are one greater than the previous
    /// maximum for that (area, level) family. The caller commits the
    /// returned board atomically with the post that uses the id.
    pub fn claim_sequence(&self, level: NestingLevel) -> Result<SequenceClaim, PostError> {
        let idx = level.tag() as usize;
        let next = self.family_counts[idx]
            .checked_add(1)
            .ok_or_else(|| PostError::SequenceOverflow {
                area: self.area.to_string(),
                level: level.tag(),
            })?;

        let mut board = self.clone();
        board.family_counts[idx] = next;
        Ok(SequenceClaim {
            sequence_id: next,
            board,
        })
    }
}
