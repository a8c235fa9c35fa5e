//! # Polls
//!
//! Simple poll / poll-option records. Options are indexed 0..=255 within
//! their poll; both carry an active flag and tally through the shared
//! vote aggregator.

use serde::{Deserialize, Serialize};
use shared_types::VoteTally;

use super::GovernanceError;

/// Maximum byte length of a poll or option name.
pub const MAX_POLL_NAME_LEN: usize = 144;

fn check_name(name: &str) -> Result<(), GovernanceError> {
    if name.len() > MAX_POLL_NAME_LEN {
        return Err(GovernanceError::NameTooLong {
            len: name.len(),
            max: MAX_POLL_NAME_LEN,
        });
    }
    Ok(())
}

/// One poll, indexed from the protocol root's counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub index: u128,
    pub name: String,
    pub is_active: bool,
    /// Number of options ever created; also the next free option index.
    pub option_count: u16,
}

impl Poll {
    pub fn new(index: u128, name: impl Into<String>) -> Result<Self, GovernanceError> {
        let name = name.into();
        check_name(&name)?;
        Ok(Self {
            index,
            name,
            is_active: true,
            option_count: 0,
        })
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), GovernanceError> {
        let name = name.into();
        check_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    /// Claims the next option index, returning it and the advanced poll.
    pub fn claim_option_index(&self) -> Result<(u8, Poll), GovernanceError> {
        if self.option_count > u8::MAX as u16 {
            return Err(GovernanceError::OptionIndexExhausted {
                poll_index: self.index,
            });
        }
        let index = self.option_count as u8;
        let mut poll = self.clone();
        poll.option_count += 1;
        Ok((index, poll))
    }
}

/// One option belonging to a poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    pub poll_index: u128,
    pub option_index: u8,
    pub name: String,
    pub is_active: bool,
    pub tally: VoteTally,
}

impl PollOption {
    pub fn new(
        poll_index: u128,
        option_index: u8,
        name: impl Into<String>,
    ) -> Result<Self, GovernanceError> {
        let name = name.into();
        check_name(&name)?;
        Ok(Self {
            poll_index,
            option_index,
            name,
            is_active: true,
            tally: VoteTally::default(),
        })
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), GovernanceError> {
        let name = name.into();
        check_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    /// Applies one vote; the poll and the option must both be active.
    pub fn vote(&mut self, poll: &Poll, amount: i64) -> Result<(), GovernanceError> {
        if !poll.is_active || !self.is_active {
            return Err(GovernanceError::PollInactive {
                poll_index: self.poll_index,
                option_index: Some(self.option_index),
            });
        }
        self.tally.apply(amount)?;
        Ok(())
    }
}
