//! # Key Derivation
//!
//! SHA-256 over length-prefixed seeds. Length prefixes keep the encoding
//! injective: `["ab", "c"]` and `["a", "bc"]` hash differently.

use sha2::{Digest, Sha256};
use shared_types::RecordKey;

use super::EntitySeed;

/// Derives the storage key for an entity.
///
/// Identical inputs always yield identical keys; the function reads no
/// stored state. This is the only way record keys are produced anywhere
/// in the workspace.
#[must_use]
pub fn derive_key(seed: &EntitySeed<'_>) -> RecordKey {
    let mut hasher = Sha256::new();
    for part in seed.seed_bytes() {
        hasher.update((part.len() as u32).to_le_bytes());
        hasher.update(&part);
    }
    RecordKey(hasher.finalize().into())
}
