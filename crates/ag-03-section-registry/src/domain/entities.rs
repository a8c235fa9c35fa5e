//! # Section Record
//!
//! A named sub-scope of an area that posts attach to, carrying its own
//! subject-level vote tally and the disabled gate.

use serde::{Deserialize, Serialize};
use shared_types::{AreaTag, SectionName, VoteTally};

use super::SectionError;

/// One comment section within a content area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub area: AreaTag,
    pub name: SectionName,
    /// When set, post creation inside this section is rejected.
    pub is_disabled: bool,
    /// Votes cast on the section's subject (video/page), not on posts.
    pub video_tally: VoteTally,
}

impl Section {
    /// A freshly created section: enabled, all tallies zero.
    #[must_use]
    pub fn new(area: AreaTag, name: SectionName) -> Self {
        Self {
            area,
            name,
            is_disabled: false,
            video_tally: VoteTally::default(),
        }
    }

    /// Direct toggle of the disabled gate. Idempotent.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.is_disabled = disabled;
    }

    /// Rejects post creation while disabled.
    pub fn check_accepts_posts(&self) -> Result<(), SectionError> {
        if self.is_disabled {
            return Err(SectionError::Disabled {
                area: self.area.to_string(),
                name: self.name.to_string(),
            });
        }
        Ok(())
    }

    /// Applies one vote to the section subject's tally.
    pub fn vote_on_subject(&mut self, amount: i64) -> Result<(), SectionError> {
        self.video_tally.apply(amount)?;
        Ok(())
    }
}
