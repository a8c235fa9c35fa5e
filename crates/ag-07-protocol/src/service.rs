//! # Protocol Service
//!
//! Implements [`AgoraApi`] over any [`RecordStore`]. Every operation
//! follows the same shape: read the records it touches (with their
//! versions), run the pure domain transitions, and commit one
//! [`StateTransition`] carrying every observed version as an expectation.
//! Concurrent writers racing on the same record are serialized by the
//! store; the loser surfaces `PreconditionFailed` with no partial effect
//! and is never retried here.

use std::sync::Arc;

use ag_01_addressing::{derive_key, EntitySeed};
use ag_02_author_ledger::{AuthorLedger, LedgerError};
use ag_03_section_registry::{Section, SectionError};
use ag_04_post_store::{
    AreaBoard, NestingLevel, ParentRef, Post, PostConfig, PostDraft, PostError,
};
use ag_05_idea_sidecar::{Idea, IdeaError};
use ag_06_governance::{FeeAsset, GovernanceError, Poll, PollOption, ProtocolCeo, ProtocolRoot};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{AccountId, AreaTag, AssetId, ProtocolError, RecordKey, SectionName, VoteError};
use tracing::info;

use crate::ports::inbound::AgoraApi;
use crate::ports::outbound::{CommitError, IndexKey, RecordStore, StateTransition, StoreError};
use crate::requests::{PollOptionReceipt, PollReceipt, PostLocator, PostReceipt, Receipt};

// ============================================================================
// Configuration
// ============================================================================

/// Tunable limits of the protocol surface.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub post: PostConfig,
}

// ============================================================================
// Key derivation shorthands
// ============================================================================

fn ledger_key(author: &AccountId) -> RecordKey {
    derive_key(&EntitySeed::AuthorLedger { author })
}

fn section_key(area: &AreaTag, name: &SectionName) -> RecordKey {
    derive_key(&EntitySeed::Section { area, name })
}

fn board_key(area: &AreaTag) -> RecordKey {
    derive_key(&EntitySeed::AreaBoard { area })
}

fn post_key(locator: &PostLocator) -> RecordKey {
    derive_key(&EntitySeed::Post {
        area: &locator.area,
        level_tag: locator.level.tag(),
        author: &locator.owner,
        position: locator.position,
    })
}

fn idea_key(locator: &PostLocator) -> RecordKey {
    derive_key(&EntitySeed::Idea {
        area: &locator.area,
        section: &locator.section,
        post_owner: &locator.owner,
        post_position: locator.position,
    })
}

fn ceo_key() -> RecordKey {
    derive_key(&EntitySeed::ProtocolCeo)
}

fn root_key() -> RecordKey {
    derive_key(&EntitySeed::ProtocolRoot)
}

fn fee_asset_key(asset: &AssetId) -> RecordKey {
    derive_key(&EntitySeed::FeeAsset { asset })
}

fn poll_key(index: u128) -> RecordKey {
    derive_key(&EntitySeed::Poll { index })
}

fn poll_option_key(poll_index: u128, option_index: u8) -> RecordKey {
    derive_key(&EntitySeed::PollOption {
        poll_index,
        option_index,
    })
}

// ============================================================================
// Domain error severity mapping
// ============================================================================

fn vote_error(err: VoteError) -> ProtocolError {
    match err {
        VoteError::ZeroAmount => ProtocolError::InvalidInput {
            reason: err.to_string(),
        },
        VoteError::Overflow { .. } => ProtocolError::PreconditionFailed {
            reason: err.to_string(),
        },
    }
}

fn ledger_error(err: LedgerError) -> ProtocolError {
    match err {
        LedgerError::DisplayNameTooLong { .. } => ProtocolError::InvalidInput {
            reason: err.to_string(),
        },
        LedgerError::CounterOverflow { .. } => ProtocolError::PreconditionFailed {
            reason: err.to_string(),
        },
    }
}

fn section_error(err: SectionError) -> ProtocolError {
    match err {
        SectionError::Disabled { .. } => ProtocolError::PreconditionFailed {
            reason: err.to_string(),
        },
        SectionError::Vote(inner) => vote_error(inner),
    }
}

fn post_error(err: PostError) -> ProtocolError {
    match err {
        PostError::MessageTooLong { .. } | PostError::EmptyMessage => {
            ProtocolError::InvalidInput {
                reason: err.to_string(),
            }
        }
        PostError::NotOwner { .. } => ProtocolError::Unauthorized {
            reason: err.to_string(),
        },
        PostError::Vote(inner) => vote_error(inner),
        PostError::NestingTooDeep { .. }
        | PostError::ParentSectionMismatch { .. }
        | PostError::SequenceOverflow { .. } => ProtocolError::PreconditionFailed {
            reason: err.to_string(),
        },
    }
}

fn idea_error(err: IdeaError) -> ProtocolError {
    ProtocolError::InvalidInput {
        reason: err.to_string(),
    }
}

fn governance_error(err: GovernanceError) -> ProtocolError {
    match err {
        GovernanceError::NotCeo { .. } => ProtocolError::Unauthorized {
            reason: err.to_string(),
        },
        GovernanceError::NameTooLong { .. } => ProtocolError::InvalidInput {
            reason: err.to_string(),
        },
        GovernanceError::Vote(inner) => vote_error(inner),
        GovernanceError::PollInactive { .. }
        | GovernanceError::OptionIndexExhausted { .. }
        | GovernanceError::PollCounterOverflow => ProtocolError::PreconditionFailed {
            reason: err.to_string(),
        },
    }
}

fn store_error(err: StoreError) -> ProtocolError {
    ProtocolError::Storage(err.to_string())
}

fn commit_error(err: CommitError) -> ProtocolError {
    match err {
        CommitError::VersionMismatch { .. } | CommitError::Missing { .. } => {
            ProtocolError::PreconditionFailed {
                reason: err.to_string(),
            }
        }
        CommitError::UnexpectedlyPresent { key } => ProtocolError::already_exists("record", key),
        CommitError::Store(inner) => store_error(inner),
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    bincode::serialize(value).map_err(|e| ProtocolError::Storage(format!("encode failed: {e}")))
}

// ============================================================================
// Service
// ============================================================================

/// The protocol operation surface over a pluggable record store.
pub struct AgoraService<S> {
    store: Arc<S>,
    config: ServiceConfig,
}

impl<S: RecordStore> AgoraService<S> {
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, ServiceConfig::default())
    }

    #[must_use]
    pub fn with_config(store: Arc<S>, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    fn fetch<T: DeserializeOwned>(
        &self,
        key: &RecordKey,
    ) -> Result<Option<(T, u64)>, ProtocolError> {
        match self.store.get(key).map_err(store_error)? {
            Some(versioned) => {
                let value = bincode::deserialize(&versioned.bytes)
                    .map_err(|e| ProtocolError::Storage(format!("decode {key} failed: {e}")))?;
                Ok(Some((value, versioned.version)))
            }
            None => Ok(None),
        }
    }

    fn fetch_required<T: DeserializeOwned>(
        &self,
        key: &RecordKey,
        entity: &'static str,
    ) -> Result<(T, u64), ProtocolError> {
        self.fetch(key)?
            .ok_or_else(|| ProtocolError::not_found(entity, key))
    }

    fn commit(&self, transition: StateTransition) -> Result<(), ProtocolError> {
        self.store.commit(transition).map_err(commit_error)
    }

    /// Single-record read-modify-write with an optimistic version guard.
    fn write_back<T: Serialize>(
        &self,
        key: RecordKey,
        version: u64,
        value: &T,
    ) -> Result<(), ProtocolError> {
        let mut tx = StateTransition::new();
        tx.expect_version(key, version).put(key, encode(value)?);
        self.commit(tx)
    }

    /// Read-modify-write whose commit also expects a gate record (the
    /// fee-asset entry or the CEO capability) at the version observed
    /// during the check. A gate mutation racing this operation makes the
    /// commit lose instead of slipping past the check.
    fn guarded_write_back<T: Serialize>(
        &self,
        guard: (RecordKey, u64),
        key: RecordKey,
        version: u64,
        value: &T,
    ) -> Result<(), ProtocolError> {
        let mut tx = StateTransition::new();
        tx.expect_version(guard.0, guard.1);
        tx.expect_version(key, version).put(key, encode(value)?);
        self.commit(tx)
    }

    /// Rejects unregistered weighting assets before any other work.
    ///
    /// Returns the registry entry's key and observed version; callers
    /// carry them as a commit expectation so a concurrent removal of the
    /// asset aborts the operation.
    fn check_fee_asset(&self, asset: &AssetId) -> Result<(RecordKey, u64), ProtocolError> {
        let key = fee_asset_key(asset);
        match self.fetch::<FeeAsset>(&key)? {
            Some((_, version)) => Ok((key, version)),
            None => Err(ProtocolError::PreconditionFailed {
                reason: format!("asset {asset} is not a registered fee asset"),
            }),
        }
    }

    /// Verifies the caller currently holds the CEO capability.
    ///
    /// Returns the capability record's key and observed version; callers
    /// carry them as a commit expectation so a concurrent succession
    /// aborts the operation.
    fn require_ceo(&self, caller: &AccountId) -> Result<(RecordKey, u64), ProtocolError> {
        let key = ceo_key();
        let (ceo, version) = self.fetch_required::<ProtocolCeo>(&key, "protocol CEO")?;
        ceo.check_is_ceo(caller).map_err(governance_error)?;
        Ok((key, version))
    }

    fn load_post(
        &self,
        locator: &PostLocator,
    ) -> Result<(Post, u64, RecordKey), ProtocolError> {
        let key = post_key(locator);
        let (post, version) = self.fetch_required::<Post>(&key, "post")?;
        Ok((post, version, key))
    }

    /// Shared creation path for comments and replies.
    ///
    /// Claims the author's next position and the family's next sequence id,
    /// then commits ledger, board, and the new post in one transition. The
    /// section's and the fee asset's versions are expectations too, so a
    /// concurrent disable or asset removal cannot slip past the gate checks.
    fn create_post(
        &self,
        fee_asset: &AssetId,
        draft: PostDraft,
    ) -> Result<PostReceipt, ProtocolError> {
        let fee_guard = self.check_fee_asset(fee_asset)?;

        let sect_key = section_key(&draft.area, &draft.section_name);
        let (section, section_version) = self.fetch_required::<Section>(&sect_key, "section")?;
        section.check_accepts_posts().map_err(section_error)?;

        let brd_key = board_key(&draft.area);
        let (board, board_version) = self.fetch_required::<AreaBoard>(&brd_key, "area board")?;
        let seq = board.claim_sequence(draft.level).map_err(post_error)?;

        let ldg_key = ledger_key(&draft.owner);
        let (ledger, ledger_version) = match self.fetch::<AuthorLedger>(&ldg_key)? {
            Some((ledger, version)) => (ledger, Some(version)),
            None => (AuthorLedger::new(draft.owner), None),
        };
        let claim = ledger.claim_position().map_err(ledger_error)?;

        let mut post = Post::compose(&self.config.post, draft).map_err(post_error)?;
        post.sequence_id = seq.sequence_id;
        post.author_post_position = claim.position;

        let key = derive_key(&EntitySeed::Post {
            area: &post.area,
            level_tag: post.level.tag(),
            author: &post.post_owner,
            position: post.author_post_position,
        });

        let mut tx = StateTransition::new();
        tx.expect_version(fee_guard.0, fee_guard.1);
        tx.expect_version(sect_key, section_version);
        tx.expect_version(brd_key, board_version)
            .put(brd_key, encode(&seq.board)?);
        match ledger_version {
            Some(version) => {
                tx.expect_version(ldg_key, version);
            }
            None => {
                tx.expect_absent(ldg_key);
            }
        }
        tx.put(ldg_key, encode(&claim.ledger)?);
        tx.expect_absent(key).put(key, encode(&post)?);

        // A first-ever post also registers the author on the root census.
        if ledger_version.is_none() {
            if let Some((root, version)) = self.fetch::<ProtocolRoot>(&root_key())? {
                tx.expect_version(root_key(), version)
                    .put(root_key(), encode(&root.with_author_counted())?);
            }
        }

        tx.append_index(
            IndexKey::AreaPosts {
                area: post.area.clone(),
                level: post.level,
            },
            key,
        );
        tx.append_index(
            IndexKey::SectionPosts {
                area: post.area.clone(),
                level: post.level,
                section: post.section_name.clone(),
            },
            key,
        );
        tx.append_index(
            IndexKey::AuthorPosts {
                author: post.post_owner,
            },
            key,
        );

        self.commit(tx)?;
        info!(
            area = %post.area,
            section = %post.section_name,
            level = ?post.level,
            owner = %post.post_owner,
            position = %post.author_post_position,
            sequence_id = post.sequence_id,
            "post created"
        );
        Ok(PostReceipt {
            key,
            level: post.level,
            sequence_id: post.sequence_id,
            author_post_position: post.author_post_position,
        })
    }

    fn check_post_owner(post: &Post, caller: &AccountId) -> Result<(), ProtocolError> {
        if caller != &post.post_owner {
            return Err(ProtocolError::Unauthorized {
                reason: format!(
                    "caller {caller} does not own post by {}",
                    post.post_owner
                ),
            });
        }
        Ok(())
    }

    /// Loads the idea sidecar for a post, lazily materializing a blank one.
    fn load_or_new_idea(
        &self,
        target: &PostLocator,
    ) -> Result<(Idea, Option<u64>, RecordKey), ProtocolError> {
        let key = idea_key(target);
        match self.fetch::<Idea>(&key)? {
            Some((idea, version)) => Ok((idea, Some(version), key)),
            None => Ok((
                Idea::new(
                    target.area.clone(),
                    target.section.clone(),
                    target.owner,
                    target.position,
                ),
                None,
                key,
            )),
        }
    }

    fn commit_idea(
        &self,
        guard: Option<(RecordKey, u64)>,
        key: RecordKey,
        version: Option<u64>,
        idea: &Idea,
    ) -> Result<Receipt, ProtocolError> {
        let mut tx = StateTransition::new();
        if let Some((gate_key, gate_version)) = guard {
            tx.expect_version(gate_key, gate_version);
        }
        match version {
            Some(version) => {
                tx.expect_version(key, version);
            }
            None => {
                tx.expect_absent(key);
            }
        }
        tx.put(key, encode(idea)?);
        self.commit(tx)?;
        Ok(Receipt { key })
    }
}

#[async_trait]
impl<S: RecordStore> AgoraApi for AgoraService<S> {
    // ------------------------------------------------------------------
    // Governance
    // ------------------------------------------------------------------

    async fn init_admin(&self, caller: AccountId) -> Result<Receipt, ProtocolError> {
        let key = ceo_key();
        if self.fetch::<ProtocolCeo>(&key)?.is_some() {
            return Err(ProtocolError::already_exists("protocol CEO", key));
        }
        let mut tx = StateTransition::new();
        tx.expect_absent(key)
            .put(key, encode(&ProtocolCeo::new(caller))?);
        self.commit(tx)?;
        info!(ceo = %caller, "protocol CEO initialized");
        Ok(Receipt { key })
    }

    async fn pass_on_ceo(
        &self,
        caller: AccountId,
        successor: AccountId,
    ) -> Result<(), ProtocolError> {
        let (mut ceo, version) = self.fetch_required::<ProtocolCeo>(&ceo_key(), "protocol CEO")?;
        ceo.pass_on(&caller, successor).map_err(governance_error)?;
        self.write_back(ceo_key(), version, &ceo)?;
        info!(from = %caller, to = %successor, "protocol CEO passed on");
        Ok(())
    }

    async fn init_protocol(&self, caller: AccountId) -> Result<Receipt, ProtocolError> {
        let ceo_guard = self.require_ceo(&caller)?;
        let key = root_key();
        if self.fetch::<ProtocolRoot>(&key)?.is_some() {
            return Err(ProtocolError::already_exists("protocol root", key));
        }
        let mut tx = StateTransition::new();
        tx.expect_version(ceo_guard.0, ceo_guard.1);
        tx.expect_absent(key).put(key, encode(&ProtocolRoot::default())?);
        self.commit(tx)?;
        Ok(Receipt { key })
    }

    async fn add_fee_asset(
        &self,
        caller: AccountId,
        asset: AssetId,
        decimals: u8,
    ) -> Result<Receipt, ProtocolError> {
        let ceo_guard = self.require_ceo(&caller)?;
        let key = fee_asset_key(&asset);
        if self.fetch::<FeeAsset>(&key)?.is_some() {
            return Err(ProtocolError::already_exists("fee asset", key));
        }
        let mut tx = StateTransition::new();
        tx.expect_version(ceo_guard.0, ceo_guard.1);
        tx.expect_absent(key)
            .put(key, encode(&FeeAsset { asset, decimals })?);
        self.commit(tx)?;
        info!(%asset, decimals, "fee asset registered");
        Ok(Receipt { key })
    }

    async fn remove_fee_asset(
        &self,
        caller: AccountId,
        asset: AssetId,
    ) -> Result<(), ProtocolError> {
        let ceo_guard = self.require_ceo(&caller)?;
        let key = fee_asset_key(&asset);
        let (_, version) = self.fetch_required::<FeeAsset>(&key, "fee asset")?;
        let mut tx = StateTransition::new();
        tx.expect_version(ceo_guard.0, ceo_guard.1);
        tx.expect_version(key, version).delete(key);
        self.commit(tx)?;
        info!(%asset, "fee asset removed");
        Ok(())
    }

    async fn init_area(&self, caller: AccountId, area: AreaTag) -> Result<Receipt, ProtocolError> {
        let ceo_guard = self.require_ceo(&caller)?;
        let key = board_key(&area);
        if self.fetch::<AreaBoard>(&key)?.is_some() {
            return Err(ProtocolError::already_exists("area board", key));
        }
        let mut tx = StateTransition::new();
        tx.expect_version(ceo_guard.0, ceo_guard.1);
        tx.expect_absent(key).put(key, encode(&AreaBoard::new(area.clone()))?);
        self.commit(tx)?;
        info!(%area, "area initialized");
        Ok(Receipt { key })
    }

    // ------------------------------------------------------------------
    // Authors
    // ------------------------------------------------------------------

    async fn create_author(&self, caller: AccountId) -> Result<Receipt, ProtocolError> {
        let key = ledger_key(&caller);
        if self.fetch::<AuthorLedger>(&key)?.is_some() {
            return Err(ProtocolError::already_exists("author ledger", key));
        }
        let mut tx = StateTransition::new();
        tx.expect_absent(key)
            .put(key, encode(&AuthorLedger::new(caller))?);
        if let Some((root, version)) = self.fetch::<ProtocolRoot>(&root_key())? {
            tx.expect_version(root_key(), version)
                .put(root_key(), encode(&root.with_author_counted())?);
        }
        self.commit(tx)?;
        Ok(Receipt { key })
    }

    async fn set_display_name(
        &self,
        caller: AccountId,
        fee_asset: AssetId,
        name: String,
    ) -> Result<(), ProtocolError> {
        let fee_guard = self.check_fee_asset(&fee_asset)?;
        let key = ledger_key(&caller);
        let (mut ledger, version) = self.fetch_required::<AuthorLedger>(&key, "author ledger")?;
        ledger.set_display_name(name).map_err(ledger_error)?;
        self.guarded_write_back(fee_guard, key, version, &ledger)
    }

    async fn set_use_custom_name(
        &self,
        caller: AccountId,
        fee_asset: AssetId,
        use_custom: bool,
    ) -> Result<(), ProtocolError> {
        let fee_guard = self.check_fee_asset(&fee_asset)?;
        let key = ledger_key(&caller);
        let (mut ledger, version) = self.fetch_required::<AuthorLedger>(&key, "author ledger")?;
        ledger.set_use_custom_name(use_custom);
        self.guarded_write_back(fee_guard, key, version, &ledger)
    }

    // ------------------------------------------------------------------
    // Sections
    // ------------------------------------------------------------------

    async fn create_section(
        &self,
        caller: AccountId,
        fee_asset: AssetId,
        area: AreaTag,
        name: SectionName,
    ) -> Result<Receipt, ProtocolError> {
        let fee_guard = self.check_fee_asset(&fee_asset)?;
        let key = section_key(&area, &name);
        if self.fetch::<Section>(&key)?.is_some() {
            return Err(ProtocolError::already_exists("section", key));
        }
        let section = Section::new(area, name);
        let mut tx = StateTransition::new();
        tx.expect_version(fee_guard.0, fee_guard.1);
        tx.expect_absent(key).put(key, encode(&section)?);
        self.commit(tx)?;
        info!(
            creator = %caller,
            area = %section.area,
            section = %section.name,
            "section created"
        );
        Ok(Receipt { key })
    }

    async fn set_section_disabled(
        &self,
        caller: AccountId,
        area: AreaTag,
        name: SectionName,
        disabled: bool,
    ) -> Result<(), ProtocolError> {
        let ceo_guard = self.require_ceo(&caller)?;
        let key = section_key(&area, &name);
        let (mut section, version) = self.fetch_required::<Section>(&key, "section")?;
        section.set_disabled(disabled);
        self.guarded_write_back(ceo_guard, key, version, &section)?;
        info!(%area, section = %name, disabled, "section disable gate set");
        Ok(())
    }

    async fn vote_on_section(
        &self,
        caller: AccountId,
        fee_asset: AssetId,
        area: AreaTag,
        name: SectionName,
        amount: i64,
    ) -> Result<(), ProtocolError> {
        let fee_guard = self.check_fee_asset(&fee_asset)?;
        let key = section_key(&area, &name);
        let (mut section, version) = self.fetch_required::<Section>(&key, "section")?;
        section.vote_on_subject(amount).map_err(section_error)?;
        self.guarded_write_back(fee_guard, key, version, &section)?;
        info!(voter = %caller, %area, section = %name, amount, "subject vote applied");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Posts
    // ------------------------------------------------------------------

    async fn post_comment(
        &self,
        caller: AccountId,
        fee_asset: AssetId,
        area: AreaTag,
        section: SectionName,
        message: String,
    ) -> Result<PostReceipt, ProtocolError> {
        let draft = PostDraft {
            area,
            section_name: section,
            level: NestingLevel::Comment,
            owner: caller,
            parent: None,
            message,
        };
        self.create_post(&fee_asset, draft)
    }

    async fn post_reply(
        &self,
        caller: AccountId,
        fee_asset: AssetId,
        parent: PostLocator,
        message: String,
    ) -> Result<PostReceipt, ProtocolError> {
        let level = parent.level.child().ok_or_else(|| {
            ProtocolError::PreconditionFailed {
                reason: format!("no reply level exists below {:?}", parent.level),
            }
        })?;
        let (parent_post, _, _) = self.load_post(&parent)?;
        parent_post
            .check_reply_target(&parent.section)
            .map_err(post_error)?;

        let draft = PostDraft {
            area: parent.area.clone(),
            section_name: parent.section.clone(),
            level,
            owner: caller,
            parent: Some(ParentRef {
                owner: parent.owner,
                position: parent.position,
            }),
            message,
        };
        self.create_post(&fee_asset, draft)
    }

    async fn edit_post(
        &self,
        caller: AccountId,
        fee_asset: AssetId,
        target: PostLocator,
        message: String,
    ) -> Result<(), ProtocolError> {
        let fee_guard = self.check_fee_asset(&fee_asset)?;
        let (mut post, version, key) = self.load_post(&target)?;
        post.edit(&caller, &self.config.post, message)
            .map_err(post_error)?;
        self.guarded_write_back(fee_guard, key, version, &post)
    }

    async fn vote_on_post(
        &self,
        caller: AccountId,
        fee_asset: AssetId,
        target: PostLocator,
        amount: i64,
    ) -> Result<(), ProtocolError> {
        let fee_guard = self.check_fee_asset(&fee_asset)?;
        let (mut post, version, key) = self.load_post(&target)?;
        post.vote(amount).map_err(post_error)?;
        self.guarded_write_back(fee_guard, key, version, &post)?;
        info!(voter = %caller, %key, amount, "post vote applied");
        Ok(())
    }

    async fn star_post(
        &self,
        caller: AccountId,
        target: PostLocator,
    ) -> Result<(), ProtocolError> {
        let (mut post, version, key) = self.load_post(&target)?;
        post.set_starred(true);
        self.write_back(key, version, &post)?;
        info!(%caller, %key, "post starred");
        Ok(())
    }

    async fn unstar_post(
        &self,
        caller: AccountId,
        target: PostLocator,
    ) -> Result<(), ProtocolError> {
        let (mut post, version, key) = self.load_post(&target)?;
        post.set_starred(false);
        self.write_back(key, version, &post)?;
        info!(%caller, %key, "post unstarred");
        Ok(())
    }

    async fn fed_post(&self, caller: AccountId, target: PostLocator) -> Result<(), ProtocolError> {
        let (mut post, version, key) = self.load_post(&target)?;
        post.set_fed(true);
        self.write_back(key, version, &post)?;
        info!(%caller, %key, "post marked noteworthy");
        Ok(())
    }

    async fn unfed_post(
        &self,
        caller: AccountId,
        target: PostLocator,
    ) -> Result<(), ProtocolError> {
        let (mut post, version, key) = self.load_post(&target)?;
        post.set_fed(false);
        self.write_back(key, version, &post)?;
        info!(%caller, %key, "post unmarked noteworthy");
        Ok(())
    }

    async fn delete_post(
        &self,
        caller: AccountId,
        fee_asset: AssetId,
        target: PostLocator,
    ) -> Result<(), ProtocolError> {
        let fee_guard = self.check_fee_asset(&fee_asset)?;
        let (mut post, version, key) = self.load_post(&target)?;
        post.delete(&caller).map_err(post_error)?;
        self.guarded_write_back(fee_guard, key, version, &post)?;
        info!(%key, owner = %post.post_owner, "post soft-deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Idea sidecars
    // ------------------------------------------------------------------

    async fn set_idea(
        &self,
        caller: AccountId,
        fee_asset: AssetId,
        target: PostLocator,
        text: String,
    ) -> Result<Receipt, ProtocolError> {
        let fee_guard = self.check_fee_asset(&fee_asset)?;
        let (post, _, _) = self.load_post(&target)?;
        Self::check_post_owner(&post, &caller)?;

        let (mut idea, version, key) = self.load_or_new_idea(&target)?;
        idea.set_text(text).map_err(idea_error)?;
        self.commit_idea(Some(fee_guard), key, version, &idea)
    }

    async fn set_idea_implemented(
        &self,
        caller: AccountId,
        target: PostLocator,
        implemented: bool,
    ) -> Result<Receipt, ProtocolError> {
        let (post, _, _) = self.load_post(&target)?;
        Self::check_post_owner(&post, &caller)?;

        let (mut idea, version, key) = self.load_or_new_idea(&target)?;
        idea.set_implemented(implemented);
        self.commit_idea(None, key, version, &idea)
    }

    // ------------------------------------------------------------------
    // Polls
    // ------------------------------------------------------------------

    async fn create_poll(
        &self,
        caller: AccountId,
        name: String,
    ) -> Result<PollReceipt, ProtocolError> {
        let ceo_guard = self.require_ceo(&caller)?;
        let (root, root_version) =
            self.fetch_required::<ProtocolRoot>(&root_key(), "protocol root")?;
        let (index, root) = root.claim_poll_index().map_err(governance_error)?;
        let poll = Poll::new(index, name).map_err(governance_error)?;
        let key = poll_key(index);

        let mut tx = StateTransition::new();
        tx.expect_version(ceo_guard.0, ceo_guard.1);
        tx.expect_version(root_key(), root_version)
            .put(root_key(), encode(&root)?);
        tx.expect_absent(key).put(key, encode(&poll)?);
        self.commit(tx)?;
        info!(index = %index, name = %poll.name, "poll created");
        Ok(PollReceipt { key, index })
    }

    async fn create_poll_option(
        &self,
        caller: AccountId,
        poll_index: u128,
        name: String,
    ) -> Result<PollOptionReceipt, ProtocolError> {
        let ceo_guard = self.require_ceo(&caller)?;
        let key = poll_key(poll_index);
        let (poll, poll_version) = self.fetch_required::<Poll>(&key, "poll")?;
        let (option_index, poll) = poll.claim_option_index().map_err(governance_error)?;
        let option =
            PollOption::new(poll_index, option_index, name).map_err(governance_error)?;
        let option_key = poll_option_key(poll_index, option_index);

        let mut tx = StateTransition::new();
        tx.expect_version(ceo_guard.0, ceo_guard.1);
        tx.expect_version(key, poll_version).put(key, encode(&poll)?);
        tx.expect_absent(option_key).put(option_key, encode(&option)?);
        self.commit(tx)?;
        Ok(PollOptionReceipt {
            key: option_key,
            poll_index,
            option_index,
        })
    }

    async fn edit_poll(
        &self,
        caller: AccountId,
        poll_index: u128,
        name: String,
    ) -> Result<(), ProtocolError> {
        let ceo_guard = self.require_ceo(&caller)?;
        let key = poll_key(poll_index);
        let (mut poll, version) = self.fetch_required::<Poll>(&key, "poll")?;
        poll.set_name(name).map_err(governance_error)?;
        self.guarded_write_back(ceo_guard, key, version, &poll)
    }

    async fn edit_poll_option(
        &self,
        caller: AccountId,
        poll_index: u128,
        option_index: u8,
        name: String,
    ) -> Result<(), ProtocolError> {
        let ceo_guard = self.require_ceo(&caller)?;
        let key = poll_option_key(poll_index, option_index);
        let (mut option, version) = self.fetch_required::<PollOption>(&key, "poll option")?;
        option.set_name(name).map_err(governance_error)?;
        self.guarded_write_back(ceo_guard, key, version, &option)
    }

    async fn set_poll_active(
        &self,
        caller: AccountId,
        poll_index: u128,
        active: bool,
    ) -> Result<(), ProtocolError> {
        let ceo_guard = self.require_ceo(&caller)?;
        let key = poll_key(poll_index);
        let (mut poll, version) = self.fetch_required::<Poll>(&key, "poll")?;
        poll.set_active(active);
        self.guarded_write_back(ceo_guard, key, version, &poll)
    }

    async fn set_poll_option_active(
        &self,
        caller: AccountId,
        poll_index: u128,
        option_index: u8,
        active: bool,
    ) -> Result<(), ProtocolError> {
        let ceo_guard = self.require_ceo(&caller)?;
        let key = poll_option_key(poll_index, option_index);
        let (mut option, version) = self.fetch_required::<PollOption>(&key, "poll option")?;
        option.set_active(active);
        self.guarded_write_back(ceo_guard, key, version, &option)
    }

    async fn vote_poll_option(
        &self,
        caller: AccountId,
        fee_asset: AssetId,
        poll_index: u128,
        option_index: u8,
        amount: i64,
    ) -> Result<(), ProtocolError> {
        let fee_guard = self.check_fee_asset(&fee_asset)?;
        let pkey = poll_key(poll_index);
        let (poll, poll_version) = self.fetch_required::<Poll>(&pkey, "poll")?;
        let okey = poll_option_key(poll_index, option_index);
        let (mut option, option_version) =
            self.fetch_required::<PollOption>(&okey, "poll option")?;
        option.vote(&poll, amount).map_err(governance_error)?;

        // The fee asset's and the poll's versions are guarded too: a
        // concurrent removal or close loses or wins cleanly, never
        // half-applies.
        let mut tx = StateTransition::new();
        tx.expect_version(fee_guard.0, fee_guard.1);
        tx.expect_version(pkey, poll_version);
        tx.expect_version(okey, option_version)
            .put(okey, encode(&option)?);
        self.commit(tx)?;
        info!(voter = %caller, poll = %poll_index, option = option_index, amount, "poll vote applied");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read queries
    // ------------------------------------------------------------------

    async fn get_post(&self, locator: &PostLocator) -> Result<Post, ProtocolError> {
        let (post, _, _) = self.load_post(locator)?;
        Ok(post)
    }

    async fn posts_by_section(
        &self,
        area: AreaTag,
        level: NestingLevel,
        section: SectionName,
    ) -> Result<Vec<Post>, ProtocolError> {
        let index = IndexKey::SectionPosts {
            area,
            level,
            section,
        };
        let keys = self.store.scan_index(&index).map_err(store_error)?;
        let mut posts = Vec::with_capacity(keys.len());
        for key in keys {
            let (post, _) = self.fetch_required::<Post>(&key, "post")?;
            posts.push(post);
        }
        posts.sort_by_key(|post| post.sequence_id);
        Ok(posts)
    }

    async fn posts_by_author(&self, author: AccountId) -> Result<Vec<Post>, ProtocolError> {
        let keys = self
            .store
            .scan_index(&IndexKey::AuthorPosts { author })
            .map_err(store_error)?;
        let mut posts = Vec::with_capacity(keys.len());
        for key in keys {
            let (post, _) = self.fetch_required::<Post>(&key, "post")?;
            posts.push(post);
        }
        // Index appends are creation-ordered; author position confirms it.
        posts.sort_by_key(|post| post.author_post_position);
        Ok(posts)
    }

    async fn get_section(
        &self,
        area: AreaTag,
        name: SectionName,
    ) -> Result<Section, ProtocolError> {
        let (section, _) =
            self.fetch_required::<Section>(&section_key(&area, &name), "section")?;
        Ok(section)
    }

    async fn get_idea(&self, target: &PostLocator) -> Result<Idea, ProtocolError> {
        let (idea, _) = self.fetch_required::<Idea>(&idea_key(target), "idea")?;
        Ok(idea)
    }

    async fn get_author(&self, author: AccountId) -> Result<AuthorLedger, ProtocolError> {
        let (ledger, _) =
            self.fetch_required::<AuthorLedger>(&ledger_key(&author), "author ledger")?;
        Ok(ledger)
    }
}

// ============================================================================
// Tests
// ============================================================================
