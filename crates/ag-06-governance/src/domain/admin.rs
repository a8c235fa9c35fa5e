//! # Administrative Records
//!
//! The CEO capability, the fee-asset registry entries, and the protocol
//! root counters.

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, AssetId};

use super::GovernanceError;

/// The single privileged owner capability.
///
/// Created once at protocol initialization; replaceable only by the
/// current holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolCeo {
    pub address: AccountId,
}

impl ProtocolCeo {
    #[must_use]
    pub fn new(address: AccountId) -> Self {
        Self { address }
    }

    /// Rejects callers other than the current CEO.
    pub fn check_is_ceo(&self, caller: &AccountId) -> Result<(), GovernanceError> {
        if caller != &self.address {
            return Err(GovernanceError::NotCeo {
                caller: caller.to_string(),
            });
        }
        Ok(())
    }

    /// Hands the capability to a successor. Only the current holder may
    /// call this; the successor may be the caller itself.
    pub fn pass_on(&mut self, caller: &AccountId, successor: AccountId) -> Result<(), GovernanceError> {
        self.check_is_ceo(caller)?;
        self.address = successor;
        Ok(())
    }
}

/// One accepted fee-bearing (weighting) asset.
///
/// The decimal precision is carried for client display; it never enters
/// vote arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeAsset {
    pub asset: AssetId,
    pub decimals: u8,
}

/// Singleton protocol counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProtocolRoot {
    /// Next free poll index.
    pub poll_count: u128,
    /// Number of author ledgers ever created.
    pub author_count: u64,
}

impl ProtocolRoot {
    /// Claims the next poll index, returning it and the advanced root.
    pub fn claim_poll_index(&self) -> Result<(u128, ProtocolRoot), GovernanceError> {
        let index = self.poll_count;
        let next = index
            .checked_add(1)
            .ok_or(GovernanceError::PollCounterOverflow)?;
        let mut root = self.clone();
        root.poll_count = next;
        Ok((index, root))
    }

    /// Records one newly created author ledger.
    #[must_use]
    pub fn with_author_counted(&self) -> ProtocolRoot {
        let mut root = self.clone();
        root.author_count = root.author_count.saturating_add(1);
        root
    }
}
