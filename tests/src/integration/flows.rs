//! # Integration Test Flows
//!
//! End-to-end thread flows across the addressing, ledger, section,
//! post, and idea subsystems, driven through the full protocol surface.
//!
//! ## Flows Tested
//!
//! 1. **Comment → reply → votes**: positions, back-references, and tallies
//! 2. **Single-post lifecycle**: create, edit, vote, star, delete, reply
//! 3. **Disabled section**: rejection leaves no record behind
//! 4. **Cross-area posting**: one ledger counter spans areas and levels
//! 5. **Soft delete**: deleted posts stay addressable reply targets
//! 6. **Idea sidecar**: annotations outlive their post's deletion

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ag_03_section_registry::Section;
    use ag_04_post_store::NestingLevel;
    use ag_05_idea_sidecar::Idea;
    use ag_07_protocol::{
        AgoraApi, AgoraService, InMemoryRecordStore, PostLocator, PostReceipt,
    };
    use shared_types::{AccountId, AreaTag, AssetId, ProtocolError, SectionName};

    const CEO: AccountId = AccountId([0x01; 32]);
    const ALICE: AccountId = AccountId([0xA1; 32]);
    const BOB: AccountId = AccountId([0xB2; 32]);
    const TOKEN: AssetId = AssetId([0xFE; 32]);

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn area() -> AreaTag {
        AreaTag::new("M4A").unwrap()
    }

    fn section() -> SectionName {
        SectionName::new("Overview").unwrap()
    }

    /// Protocol with CEO, root, one fee asset, one area, and one section.
    async fn bootstrapped() -> AgoraService<InMemoryRecordStore> {
        crate::init_test_telemetry();
        let service = AgoraService::new(Arc::new(InMemoryRecordStore::new()));
        service.init_admin(CEO).await.unwrap();
        service.init_protocol(CEO).await.unwrap();
        service.add_fee_asset(CEO, TOKEN, 9).await.unwrap();
        service.init_area(CEO, area()).await.unwrap();
        service
            .create_section(CEO, TOKEN, area(), section())
            .await
            .unwrap();
        service
    }

    fn locator(receipt: &PostReceipt, owner: AccountId) -> PostLocator {
        PostLocator {
            area: area(),
            section: section(),
            level: receipt.level,
            owner,
            position: receipt.author_post_position,
        }
    }

    // =============================================================================
    // INTEGRATION TESTS
    // =============================================================================

    #[tokio::test]
    async fn test_comment_reply_vote_flow() {
        let service = bootstrapped().await;

        let hello = service
            .post_comment(ALICE, TOKEN, area(), section(), "hello".into())
            .await
            .unwrap();
        assert_eq!(hello.author_post_position, 0);
        assert_eq!(hello.sequence_id, 1);

        let hello_loc = locator(&hello, ALICE);
        let hi = service
            .post_reply(BOB, TOKEN, hello_loc.clone(), "hi".into())
            .await
            .unwrap();
        assert_eq!(hi.level, NestingLevel::Reply);
        assert_eq!(hi.author_post_position, 0);
        assert_eq!(hi.sequence_id, 1);

        service
            .vote_on_post(BOB, TOKEN, hello_loc.clone(), 100)
            .await
            .unwrap();
        let hi_loc = locator(&hi, BOB);
        service
            .vote_on_post(ALICE, TOKEN, hi_loc.clone(), -50)
            .await
            .unwrap();

        let comment = service.get_post(&hello_loc).await.unwrap();
        assert_eq!(comment.tally.up_vote_score, 100);
        assert_eq!(comment.tally.up_vote_count, 1);
        assert_eq!(comment.net_vote_score(), 100);

        let reply = service.get_post(&hi_loc).await.unwrap();
        assert_eq!(reply.tally.down_vote_score, 50);
        assert_eq!(reply.tally.down_vote_count, 1);
        assert_eq!(reply.net_vote_score(), -50);

        // The reply carries its parent's full addressable identity.
        let parent = reply.parent.unwrap();
        assert_eq!(parent.owner, ALICE);
        assert_eq!(parent.position, hello.author_post_position);

        // Each author's ledger advanced by exactly one.
        assert_eq!(
            service.get_author(ALICE).await.unwrap().post_and_reply_count,
            1
        );
        assert_eq!(
            service.get_author(BOB).await.unwrap().post_and_reply_count,
            1
        );
    }

    /// One post through its whole life: created, reworded, weighed up and
    /// down, starred, soft-deleted, and finally answered while deleted.
    #[tokio::test]
    async fn test_single_post_full_lifecycle() {
        let service = bootstrapped().await;

        let hello = service
            .post_comment(ALICE, TOKEN, area(), section(), "hello".into())
            .await
            .unwrap();
        let target = locator(&hello, ALICE);

        service
            .edit_post(ALICE, TOKEN, target.clone(), "hi".into())
            .await
            .unwrap();
        service
            .vote_on_post(BOB, TOKEN, target.clone(), 100)
            .await
            .unwrap();
        service
            .vote_on_post(BOB, TOKEN, target.clone(), -50)
            .await
            .unwrap();
        service.star_post(CEO, target.clone()).await.unwrap();
        service
            .delete_post(ALICE, TOKEN, target.clone())
            .await
            .unwrap();
        let reply = service
            .post_reply(BOB, TOKEN, target.clone(), "goodbye".into())
            .await
            .unwrap();

        // Every stage left its mark on the same record.
        let post = service.get_post(&target).await.unwrap();
        assert_eq!(post.message, "hi");
        assert_eq!(post.tally.up_vote_score, 100);
        assert_eq!(post.tally.up_vote_count, 1);
        assert_eq!(post.tally.down_vote_score, 50);
        assert_eq!(post.tally.down_vote_count, 1);
        assert_eq!(post.net_vote_score(), 50);
        assert!(post.is_starred);
        assert!(post.is_deleted);

        // The reply still resolves its deleted parent.
        let reply_post = service.get_post(&locator(&reply, BOB)).await.unwrap();
        assert_eq!(reply_post.level, NestingLevel::Reply);
        let parent = reply_post.parent.unwrap();
        assert_eq!(parent.owner, ALICE);
        assert_eq!(parent.position, hello.author_post_position);
    }

    #[tokio::test]
    async fn test_disabled_section_rejects_and_leaves_no_record() {
        let service = bootstrapped().await;
        service
            .set_section_disabled(CEO, area(), section(), true)
            .await
            .unwrap();

        let gate: Section = service.get_section(area(), section()).await.unwrap();
        assert!(gate.is_disabled);

        let err = service
            .post_comment(BOB, TOKEN, area(), section(), "sneaky".into())
            .await
            .unwrap_err();
        assert!(matches!(err, ProtocolError::PreconditionFailed { .. }));

        // No post record, no ledger, no index entry came into existence.
        let posts = service
            .posts_by_section(area(), NestingLevel::Comment, section())
            .await
            .unwrap();
        assert!(posts.is_empty());
        assert!(matches!(
            service.get_author(BOB).await,
            Err(ProtocolError::NotFound { .. })
        ));

        // Re-enabling restores the section without residue.
        service
            .set_section_disabled(CEO, area(), section(), false)
            .await
            .unwrap();
        service
            .post_comment(BOB, TOKEN, area(), section(), "back".into())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_one_ledger_counter_spans_areas_and_levels() {
        let service = bootstrapped().await;
        let other_area = AreaTag::new("PLI").unwrap();
        let other_section = SectionName::new("Roadmap").unwrap();
        service.init_area(CEO, other_area.clone()).await.unwrap();
        service
            .create_section(CEO, TOKEN, other_area.clone(), other_section.clone())
            .await
            .unwrap();

        let first = service
            .post_comment(ALICE, TOKEN, area(), section(), "one".into())
            .await
            .unwrap();
        let second = service
            .post_comment(
                ALICE,
                TOKEN,
                other_area.clone(),
                other_section.clone(),
                "two".into(),
            )
            .await
            .unwrap();
        let third = service
            .post_reply(ALICE, TOKEN, locator(&first, ALICE), "three".into())
            .await
            .unwrap();

        // Positions are dense across areas and levels.
        assert_eq!(first.author_post_position, 0);
        assert_eq!(second.author_post_position, 1);
        assert_eq!(third.author_post_position, 2);
        assert_eq!(
            service.get_author(ALICE).await.unwrap().post_and_reply_count,
            3
        );

        // Sequence ids are family-local: each of the three is first in its
        // own (area, level) family.
        assert_eq!(first.sequence_id, 1);
        assert_eq!(second.sequence_id, 1);
        assert_eq!(third.sequence_id, 1);

        let mine = service.posts_by_author(ALICE).await.unwrap();
        assert_eq!(mine.len(), 3);
        let positions: Vec<u128> = mine.iter().map(|p| p.author_post_position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_deleted_post_remains_a_reply_target() {
        let service = bootstrapped().await;
        let comment = service
            .post_comment(ALICE, TOKEN, area(), section(), "going away".into())
            .await
            .unwrap();
        let target = locator(&comment, ALICE);

        service
            .delete_post(ALICE, TOKEN, target.clone())
            .await
            .unwrap();

        let reply = service
            .post_reply(BOB, TOKEN, target.clone(), "still talking".into())
            .await
            .unwrap();
        let reply_post = service.get_post(&locator(&reply, BOB)).await.unwrap();
        let parent = reply_post.parent.unwrap();
        assert_eq!(parent.owner, ALICE);
        assert_eq!(parent.position, comment.author_post_position);

        let deleted = service.get_post(&target).await.unwrap();
        assert!(deleted.is_deleted);
        assert_eq!(deleted.message, "going away");
    }

    #[tokio::test]
    async fn test_idea_sidecar_outlives_its_post() {
        let service = bootstrapped().await;
        let comment = service
            .post_comment(ALICE, TOKEN, area(), section(), "proposal".into())
            .await
            .unwrap();
        let target = locator(&comment, ALICE);

        service
            .set_idea(ALICE, TOKEN, target.clone(), "add dark mode".into())
            .await
            .unwrap();
        service
            .delete_post(ALICE, TOKEN, target.clone())
            .await
            .unwrap();
        service
            .set_idea_implemented(ALICE, target.clone(), true)
            .await
            .unwrap();

        let idea: Idea = service.get_idea(&target).await.unwrap();
        assert_eq!(idea.idea_text, "add dark mode");
        assert!(idea.is_implemented);
        assert!(idea.is_updated);
        assert_eq!(idea.post_owner, ALICE);
        assert_eq!(idea.post_position, comment.author_post_position);
    }

    #[tokio::test]
    async fn test_display_name_round_trip() {
        let service = bootstrapped().await;
        service.create_author(ALICE).await.unwrap();
        service
            .set_display_name(ALICE, TOKEN, "fdr".into())
            .await
            .unwrap();
        service
            .set_use_custom_name(ALICE, TOKEN, true)
            .await
            .unwrap();

        let ledger = service.get_author(ALICE).await.unwrap();
        assert_eq!(ledger.display_name, "fdr");
        assert!(ledger.use_custom_name);
        assert_eq!(ledger.post_and_reply_count, 0);
    }
}
