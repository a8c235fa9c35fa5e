//! # Driving Port (Inbound)
//!
//! The full operation surface of the protocol. Every mutation is atomic:
//! it either commits all of its record writes or none, and a caller that
//! loses a concurrent race on any touched record gets
//! `ProtocolError::PreconditionFailed` with no partial effect.

use ag_02_author_ledger::AuthorLedger;
use ag_03_section_registry::Section;
use ag_04_post_store::{NestingLevel, Post};
use ag_05_idea_sidecar::Idea;
use async_trait::async_trait;
use shared_types::{AccountId, AreaTag, AssetId, ProtocolError, SectionName};

use crate::requests::{PollOptionReceipt, PollReceipt, PostLocator, PostReceipt, Receipt};

/// Protocol operations, mutations and read queries.
///
/// Fee-asset parameters on mutating calls are checked against the fee
/// registry before anything else; an unregistered asset rejects the call.
#[async_trait]
pub trait AgoraApi: Send + Sync {
    // ========================================================================
    // Governance
    // ========================================================================

    /// Creates the CEO record. First caller wins; exactly once per deploy.
    async fn init_admin(&self, caller: AccountId) -> Result<Receipt, ProtocolError>;

    /// Transfers the CEO role. Current CEO only.
    async fn pass_on_ceo(
        &self,
        caller: AccountId,
        successor: AccountId,
    ) -> Result<(), ProtocolError>;

    /// Creates the protocol root (poll and author counters). CEO only.
    async fn init_protocol(&self, caller: AccountId) -> Result<Receipt, ProtocolError>;

    /// Registers an asset as valid for fee payment. CEO only.
    async fn add_fee_asset(
        &self,
        caller: AccountId,
        asset: AssetId,
        decimals: u8,
    ) -> Result<Receipt, ProtocolError>;

    /// Unregisters a fee asset. CEO only.
    async fn remove_fee_asset(&self, caller: AccountId, asset: AssetId)
        -> Result<(), ProtocolError>;

    /// Creates the sequence board for an area. CEO only.
    async fn init_area(&self, caller: AccountId, area: AreaTag) -> Result<Receipt, ProtocolError>;

    // ========================================================================
    // Authors
    // ========================================================================

    /// Creates the caller's author ledger with a zeroed position counter.
    async fn create_author(&self, caller: AccountId) -> Result<Receipt, ProtocolError>;

    /// Sets the caller's display name (<= 144 bytes).
    async fn set_display_name(
        &self,
        caller: AccountId,
        fee_asset: AssetId,
        name: String,
    ) -> Result<(), ProtocolError>;

    /// Toggles whether the display name is shown instead of the account id.
    async fn set_use_custom_name(
        &self,
        caller: AccountId,
        fee_asset: AssetId,
        use_custom: bool,
    ) -> Result<(), ProtocolError>;

    // ========================================================================
    // Sections
    // ========================================================================

    /// Creates a section under an area. Anyone may create; duplicates are
    /// rejected with `AlreadyExists`.
    async fn create_section(
        &self,
        caller: AccountId,
        fee_asset: AssetId,
        area: AreaTag,
        name: SectionName,
    ) -> Result<Receipt, ProtocolError>;

    /// Sets a section's disabled gate. CEO only. Disabled sections reject
    /// new posts but keep serving reads and subject votes.
    async fn set_section_disabled(
        &self,
        caller: AccountId,
        area: AreaTag,
        name: SectionName,
        disabled: bool,
    ) -> Result<(), ProtocolError>;

    /// Votes on the section's subject itself (not on any post).
    async fn vote_on_section(
        &self,
        caller: AccountId,
        fee_asset: AssetId,
        area: AreaTag,
        name: SectionName,
        amount: i64,
    ) -> Result<(), ProtocolError>;

    // ========================================================================
    // Posts
    // ========================================================================

    /// Creates a top-level comment in a section.
    async fn post_comment(
        &self,
        caller: AccountId,
        fee_asset: AssetId,
        area: AreaTag,
        section: SectionName,
        message: String,
    ) -> Result<PostReceipt, ProtocolError>;

    /// Creates a reply one level below `parent`. The parent may be
    /// deleted; its section must match the one it was posted in.
    async fn post_reply(
        &self,
        caller: AccountId,
        fee_asset: AssetId,
        parent: PostLocator,
        message: String,
    ) -> Result<PostReceipt, ProtocolError>;

    /// Replaces a post's message. Owner only.
    async fn edit_post(
        &self,
        caller: AccountId,
        fee_asset: AssetId,
        target: PostLocator,
        message: String,
    ) -> Result<(), ProtocolError>;

    /// Applies a token-weighted vote to a post. Deleted posts still
    /// accept votes.
    async fn vote_on_post(
        &self,
        caller: AccountId,
        fee_asset: AssetId,
        target: PostLocator,
        amount: i64,
    ) -> Result<(), ProtocolError>;

    /// Sets the starred flag. Idempotent.
    async fn star_post(&self, caller: AccountId, target: PostLocator)
        -> Result<(), ProtocolError>;

    /// Clears the starred flag. Idempotent.
    async fn unstar_post(
        &self,
        caller: AccountId,
        target: PostLocator,
    ) -> Result<(), ProtocolError>;

    /// Sets the noteworthy ("FED") flag. Idempotent.
    async fn fed_post(&self, caller: AccountId, target: PostLocator) -> Result<(), ProtocolError>;

    /// Clears the noteworthy flag. Idempotent.
    async fn unfed_post(&self, caller: AccountId, target: PostLocator)
        -> Result<(), ProtocolError>;

    /// Soft-deletes a post. Owner only. Content, tallies, and children
    /// are preserved; the address keeps resolving.
    async fn delete_post(
        &self,
        caller: AccountId,
        fee_asset: AssetId,
        target: PostLocator,
    ) -> Result<(), ProtocolError>;

    // ========================================================================
    // Idea sidecars
    // ========================================================================

    /// Sets the idea text attached to a post, lazily creating the sidecar.
    /// Post owner only. Marks the idea updated.
    async fn set_idea(
        &self,
        caller: AccountId,
        fee_asset: AssetId,
        target: PostLocator,
        text: String,
    ) -> Result<Receipt, ProtocolError>;

    /// Sets the implemented flag on a post's idea sidecar, lazily
    /// creating it. Post owner only; does not touch the updated flag.
    async fn set_idea_implemented(
        &self,
        caller: AccountId,
        target: PostLocator,
        implemented: bool,
    ) -> Result<Receipt, ProtocolError>;

    // ========================================================================
    // Polls
    // ========================================================================

    /// Creates a poll, consuming the next index from the protocol root.
    /// CEO only.
    async fn create_poll(
        &self,
        caller: AccountId,
        name: String,
    ) -> Result<PollReceipt, ProtocolError>;

    /// Adds an option to a poll, consuming the poll's next option index.
    /// CEO only.
    async fn create_poll_option(
        &self,
        caller: AccountId,
        poll_index: u128,
        name: String,
    ) -> Result<PollOptionReceipt, ProtocolError>;

    /// Renames a poll. CEO only.
    async fn edit_poll(
        &self,
        caller: AccountId,
        poll_index: u128,
        name: String,
    ) -> Result<(), ProtocolError>;

    /// Renames a poll option. CEO only.
    async fn edit_poll_option(
        &self,
        caller: AccountId,
        poll_index: u128,
        option_index: u8,
        name: String,
    ) -> Result<(), ProtocolError>;

    /// Opens or closes a poll. CEO only.
    async fn set_poll_active(
        &self,
        caller: AccountId,
        poll_index: u128,
        active: bool,
    ) -> Result<(), ProtocolError>;

    /// Opens or closes one option. CEO only.
    async fn set_poll_option_active(
        &self,
        caller: AccountId,
        poll_index: u128,
        option_index: u8,
        active: bool,
    ) -> Result<(), ProtocolError>;

    /// Votes on a poll option; the poll and the option must both be
    /// active.
    async fn vote_poll_option(
        &self,
        caller: AccountId,
        fee_asset: AssetId,
        poll_index: u128,
        option_index: u8,
        amount: i64,
    ) -> Result<(), ProtocolError>;

    // ========================================================================
    // Read queries
    // ========================================================================

    /// Resolves one post by its full address.
    async fn get_post(&self, locator: &PostLocator) -> Result<Post, ProtocolError>;

    /// All posts of one (area, level) family within a section, in
    /// ascending sequence order.
    async fn posts_by_section(
        &self,
        area: AreaTag,
        level: NestingLevel,
        section: SectionName,
    ) -> Result<Vec<Post>, ProtocolError>;

    /// All posts ever created by one author, oldest first.
    async fn posts_by_author(&self, author: AccountId) -> Result<Vec<Post>, ProtocolError>;

    /// Resolves one section record.
    async fn get_section(&self, area: AreaTag, name: SectionName)
        -> Result<Section, ProtocolError>;

    /// Resolves the idea sidecar attached to a post, if one was created.
    async fn get_idea(&self, target: &PostLocator) -> Result<Idea, ProtocolError>;

    /// Resolves one author ledger.
    async fn get_author(&self, author: AccountId) -> Result<AuthorLedger, ProtocolError>;
}
