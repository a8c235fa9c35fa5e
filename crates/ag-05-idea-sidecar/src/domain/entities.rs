//! # Idea Record
//!
//! A mutable "idea" annotation on a post. Keyed by the post's composite
//! identity (area, section, owner, position); its lifecycle is
//! independent of the post's own deletion state.

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, AreaTag, SectionName};

use super::IdeaError;

/// Maximum byte length of the idea text.
pub const MAX_IDEA_LEN: usize = 444;

/// Idea annotation attached to one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    pub area: AreaTag,
    pub section_name: SectionName,
    pub post_owner: AccountId,
    pub post_position: u128,
    pub idea_text: String,
    pub is_implemented: bool,
    /// Set once the text has ever been written; `set_implemented` alone
    /// does not imply an update.
    pub is_updated: bool,
}

impl Idea {
    /// An empty sidecar, created lazily on the first annotation call.
    #[must_use]
    pub fn new(
        area: AreaTag,
        section_name: SectionName,
        post_owner: AccountId,
        post_position: u128,
    ) -> Self {
        Self {
            area,
            section_name,
            post_owner,
            post_position,
            idea_text: String::new(),
            is_implemented: false,
            is_updated: false,
        }
    }

    /// Replaces the idea text and marks the sidecar updated.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<(), IdeaError> {
        let text = text.into();
        if text.len() > MAX_IDEA_LEN {
            return Err(IdeaError::TextTooLong {
                len: text.len(),
                max: MAX_IDEA_LEN,
            });
        }
        self.idea_text = text;
        self.is_updated = true;
        Ok(())
    }

    /// Sets the implemented flag without touching `is_updated`.
    pub fn set_implemented(&mut self, implemented: bool) {
        self.is_implemented = implemented;
    }
}
