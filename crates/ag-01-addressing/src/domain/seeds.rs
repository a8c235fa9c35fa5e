//! # Entity Seeds
//!
//! One variant per addressable record kind. Each variant knows how to
//! flatten itself into the byte seeds fed to the key derivation hash.
//!
//! Integer seeds are encoded little-endian with a fixed width so that the
//! byte layout of a seed list is unambiguous. String seeds are length
//! bounded by construction (`AreaTag`, `SectionName`).

use shared_types::{AccountId, AreaTag, AssetId, SectionName};

/// The addressable entity kinds of the protocol and their scoping seeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntitySeed<'a> {
    /// Per-author ledger holding the monotonic post position counter.
    AuthorLedger { author: &'a AccountId },

    /// A named comment section within an area.
    Section {
        area: &'a AreaTag,
        name: &'a SectionName,
    },

    /// A post at any nesting level. `level_tag` distinguishes the
    /// family (0 = top-level comment, 1..3 = reply depths).
    Post {
        area: &'a AreaTag,
        level_tag: u8,
        author: &'a AccountId,
        position: u128,
    },

    /// Idea annotation attached to a post. The owner is part of the seed
    /// because positions are only unique per author.
    Idea {
        area: &'a AreaTag,
        section: &'a SectionName,
        post_owner: &'a AccountId,
        post_position: u128,
    },

    /// Per-area board carrying the family-local sequence counters.
    AreaBoard { area: &'a AreaTag },

    /// Singleton protocol root (poll and author counters).
    ProtocolRoot,

    /// Singleton owner-capability record.
    ProtocolCeo,

    /// One registered fee-bearing asset.
    FeeAsset { asset: &'a AssetId },

    /// A poll, indexed from the protocol root's poll counter.
    Poll { index: u128 },

    /// An option belonging to a poll.
    PollOption { poll_index: u128, option_index: u8 },
}

impl EntitySeed<'_> {
    /// Flattens the entity kind and its scoping seeds into byte slices.
    ///
    /// The leading seed is a domain tag naming the entity kind, so no two
    /// kinds can collide even with identical trailing seeds.
    #[must_use]
    pub fn seed_bytes(&self) -> Vec<Vec<u8>> {
        match self {
            EntitySeed::AuthorLedger { author } => {
                vec![b"authorLedger".to_vec(), author.as_bytes().to_vec()]
            }
            EntitySeed::Section { area, name } => vec![
                b"commentSection".to_vec(),
                area.as_str().as_bytes().to_vec(),
                name.as_str().as_bytes().to_vec(),
            ],
            EntitySeed::Post {
                area,
                level_tag,
                author,
                position,
            } => vec![
                b"post".to_vec(),
                area.as_str().as_bytes().to_vec(),
                vec![*level_tag],
                author.as_bytes().to_vec(),
                position.to_le_bytes().to_vec(),
            ],
            EntitySeed::Idea {
                area,
                section,
                post_owner,
                post_position,
            } => vec![
                b"idea".to_vec(),
                area.as_str().as_bytes().to_vec(),
                section.as_str().as_bytes().to_vec(),
                post_owner.as_bytes().to_vec(),
                post_position.to_le_bytes().to_vec(),
            ],
            EntitySeed::AreaBoard { area } => {
                vec![b"areaBoard".to_vec(), area.as_str().as_bytes().to_vec()]
            }
            EntitySeed::ProtocolRoot => vec![b"protocolRoot".to_vec()],
            EntitySeed::ProtocolCeo => vec![b"protocolCEO".to_vec()],
            EntitySeed::FeeAsset { asset } => {
                vec![b"feeAsset".to_vec(), asset.as_bytes().to_vec()]
            }
            EntitySeed::Poll { index } => {
                vec![b"poll".to_vec(), index.to_le_bytes().to_vec()]
            }
            EntitySeed::PollOption {
                poll_index,
                option_index,
            } => vec![
                b"pollOption".to_vec(),
                poll_index.to_le_bytes().to_vec(),
                vec![*option_index],
            ],
        }
    }
}
