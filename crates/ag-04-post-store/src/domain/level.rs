//! # Nesting Levels
//!
//! The reply-depth families of a thread. The protocol observed exactly
//! four; the enum carries those four, and the effective cap is
//! `PostConfig::max_nesting_depth` so shallower deployments are a config
//! change, not a type change.

use serde::{Deserialize, Serialize};

/// Reply depth of a post. `Comment` is depth 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NestingLevel {
    /// Top-level comment on a section.
    Comment,
    /// Reply to a comment.
    Reply,
    /// Reply to a reply.
    ReplyLv3,
    /// Reply to a reply-to-reply.
    ReplyLv4,
}

impl NestingLevel {
    /// All levels, shallowest first.
    pub const ALL: [NestingLevel; 4] = [
        NestingLevel::Comment,
        NestingLevel::Reply,
        NestingLevel::ReplyLv3,
        NestingLevel::ReplyLv4,
    ];

    /// Stable byte tag used in address derivation seeds.
    #[must_use]
    pub fn tag(self) -> u8 {
        match self {
            NestingLevel::Comment => 0,
            NestingLevel::Reply => 1,
            NestingLevel::ReplyLv3 => 2,
            NestingLevel::ReplyLv4 => 3,
        }
    }

    /// 1-based depth of this level.
    #[must_use]
    pub fn depth(self) -> u8 {
        self.tag() + 1
    }

    /// The level a reply to this post lives at, if the family exists.
    #[must_use]
    pub fn child(self) -> Option<NestingLevel> {
        match self {
            NestingLevel::Comment => Some(NestingLevel::Reply),
            NestingLevel::Reply => Some(NestingLevel::ReplyLv3),
            NestingLevel::ReplyLv3 => Some(NestingLevel::ReplyLv4),
            NestingLevel::ReplyLv4 => None,
        }
    }
}
