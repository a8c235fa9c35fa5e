//! # Core Domain Entities
//!
//! Identity and naming primitives used by every subsystem.
//!
//! ## Clusters
//!
//! - **Identity**: `AccountId`, `AssetId`
//! - **Scoping**: `AreaTag`, `SectionName`
//! - **Storage**: `RecordKey`

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::ProtocolError;

/// Maximum byte length of an area tag or section name.
///
/// Both participate in address derivation seeds, and the original host
/// environment capped each seed at 32 bytes.
pub const MAX_SCOPE_NAME_LEN: usize = 32;

/// A 32-byte opaque account identity (author, caller, or authority).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    pub const ZERO: AccountId = AccountId([0u8; 32]);

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// A 32-byte weighting-asset identity.
///
/// Assets gate which vote operations are accepted; the asset identity is
/// never mixed into vote arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct AssetId(pub [u8; 32]);

impl AssetId {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// A derived 32-byte storage key.
///
/// Keys are produced exclusively by the addressing subsystem; identical
/// derivation inputs always yield identical keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey(pub [u8; 32]);

impl RecordKey {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// A bounded-length area identifier (e.g. a media-discussion area).
///
/// Areas are top-level content categories; each is partitioned into named
/// comment sections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AreaTag(String);

impl AreaTag {
    /// Validates length and constructs the tag.
    pub fn new(tag: impl Into<String>) -> Result<Self, ProtocolError> {
        let tag = tag.into();
        if tag.is_empty() || tag.len() > MAX_SCOPE_NAME_LEN {
            return Err(ProtocolError::InvalidInput {
                reason: format!(
                    "area tag must be 1..={MAX_SCOPE_NAME_LEN} bytes, got {}",
                    tag.len()
                ),
            });
        }
        Ok(Self(tag))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AreaTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A bounded-length section name within an area (e.g. one video or page).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionName(String);

impl SectionName {
    /// Validates length and constructs the name.
    pub fn new(name: impl Into<String>) -> Result<Self, ProtocolError> {
        let name = name.into();
        if name.is_empty() || name.len() > MAX_SCOPE_NAME_LEN {
            return Err(ProtocolError::InvalidInput {
                reason: format!(
                    "section name must be 1..={MAX_SCOPE_NAME_LEN} bytes, got {}",
                    name.len()
                ),
            });
        }
        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
