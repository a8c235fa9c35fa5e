//! # Post Record and Lifecycle
//!
//! The fundamental unit of conversation and its state machine:
//! Active -> (edit keeps it Active) -> Deleted, a terminal content state
//! that preserves addressability. Star/fed flags are orthogonal toggles
//! layered on top, not states.

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, AreaTag, SectionName, VoteTally};

use super::{NestingLevel, PostConfig, PostError};

/// Back-reference identifying the post being replied to.
///
/// `(owner, position)` is the parent's complete addressable identity:
/// positions are strictly unique per author, so any client can re-derive
/// the parent's key from these two values plus the area and level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    pub owner: AccountId,
    pub position: u128,
}

/// Validated inputs for a new post, produced by [`Post::compose`].
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub area: AreaTag,
    pub section_name: SectionName,
    pub level: NestingLevel,
    pub owner: AccountId,
    pub parent: Option<ParentRef>,
    pub message: String,
}

/// One post at any nesting level of any area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Family-local chronological id, unique and increasing within the
    /// (area, level) family. Not part of the address.
    pub sequence_id: u64,
    pub area: AreaTag,
    pub section_name: SectionName,
    pub level: NestingLevel,
    /// Author identity; half of the post's addressable identity.
    pub post_owner: AccountId,
    /// The owner's ledger counter at creation time; the other half of the
    /// addressable identity, and the value replies must supply as their
    /// parent back-reference.
    pub author_post_position: u128,
    /// Absent for top-level comments.
    pub parent: Option<ParentRef>,
    pub message: String,
    pub tally: VoteTally,
    pub is_starred: bool,
    pub is_fed: bool,
    pub is_deleted: bool,
}

impl Post {
    /// Validates a new post's shape against the configured limits.
    ///
    /// Section existence, the disabled gate, and parent resolution are
    /// checked by the protocol service against live records; this covers
    /// the record-local rules (message bounds, depth cap, parent arity).
    pub fn compose(config: &PostConfig, draft: PostDraft) -> Result<Post, PostError> {
        if draft.message.is_empty() {
            return Err(PostError::EmptyMessage);
        }
        if draft.message.len() > config.max_message_len {
            return Err(PostError::MessageTooLong {
                len: draft.message.len(),
                max: config.max_message_len,
            });
        }
        if draft.level.depth() > config.max_nesting_depth {
            return Err(PostError::NestingTooDeep {
                attempted: draft.level.depth(),
                max: config.max_nesting_depth,
            });
        }
        debug_assert_eq!(
            draft.parent.is_some(),
            draft.level != NestingLevel::Comment,
            "replies carry a parent, comments do not"
        );

        Ok(Post {
            sequence_id: 0, // assigned when the family sequence is claimed
            area: draft.area,
            section_name: draft.section_name,
            level: draft.level,
            post_owner: draft.owner,
            author_post_position: 0, // assigned when the position is claimed
            parent: draft.parent,
            message: draft.message,
            tally: VoteTally::default(),
            is_starred: false,
            is_fed: false,
            is_deleted: false,
        })
    }

    /// Verifies that a reply's claimed section matches this parent's.
    ///
    /// The parent may be deleted; replying to a deleted post is permitted
    /// and preserves conversational continuity.
    pub fn check_reply_target(&self, claimed_section: &SectionName) -> Result<(), PostError> {
        if &self.section_name != claimed_section {
            return Err(PostError::ParentSectionMismatch {
                parent_section: self.section_name.to_string(),
                claimed_section: claimed_section.to_string(),
            });
        }
        Ok(())
    }

    /// Replaces the message. Owner only; vote and flag fields, the
    /// position, and the sequence id are untouched.
    pub fn edit(
        &mut self,
        caller: &AccountId,
        config: &PostConfig,
        message: impl Into<String>,
    ) -> Result<(), PostError> {
        self.check_owner(caller)?;
        let message = message.into();
        if message.is_empty() {
            return Err(PostError::EmptyMessage);
        }
        if message.len() > config.max_message_len {
            return Err(PostError::MessageTooLong {
                len: message.len(),
                max: config.max_message_len,
            });
        }
        self.message = message;
        Ok(())
    }

    /// Applies one vote. Callable on deleted posts; the observed protocol
    /// keeps accepting votes after deletion.
    pub fn vote(&mut self, amount: i64) -> Result<(), PostError> {
        self.tally.apply(amount)?;
        Ok(())
    }

    /// Sets the starred flag. Idempotent; no precondition beyond address
    /// resolution.
    pub fn set_starred(&mut self, starred: bool) {
        self.is_starred = starred;
    }

    /// Sets the noteworthy ("FED") flag. Idempotent.
    pub fn set_fed(&mut self, fed: bool) {
        self.is_fed = fed;
    }

    /// Marks the post deleted. Owner only. Message and tallies are
    /// retained, children are untouched, and there is no undelete.
    pub fn delete(&mut self, caller: &AccountId) -> Result<(), PostError> {
        self.check_owner(caller)?;
        self.is_deleted = true;
        Ok(())
    }

    /// Net vote score, recomputed from the tally components.
    #[must_use]
    pub fn net_vote_score(&self) -> i128 {
        self.tally.net_score()
    }

    fn check_owner(&self, caller: &AccountId) -> Result<(), PostError> {
        if caller != &self.post_owner {
            return Err(PostError::NotOwner {
                caller: caller.to_string(),
                owner: self.post_owner.to_string(),
            });
        }
        Ok(())
    }
}
