//! # Governance Tests
//!
//! Owner succession, fee-asset gating of every vote path, poll
//! lifecycle, and the protocol root census.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ag_01_addressing::{derive_key, EntitySeed};
    use ag_06_governance::{PollOption, ProtocolRoot};
    use ag_07_protocol::{
        AgoraApi, AgoraService, InMemoryRecordStore, PostLocator, RecordStore,
    };
    use shared_types::{AccountId, AreaTag, AssetId, ProtocolError, SectionName};

    const FOUNDER: AccountId = AccountId([0x01; 32]);
    const HEIR: AccountId = AccountId([0x02; 32]);
    const ALICE: AccountId = AccountId([0xA1; 32]);
    const TOKEN: AssetId = AssetId([0xFE; 32]);
    const UNKNOWN: AssetId = AssetId([0x00; 32]);

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn area() -> AreaTag {
        AreaTag::new("About").unwrap()
    }

    fn section() -> SectionName {
        SectionName::new("General").unwrap()
    }

    async fn bootstrapped(
        store: Arc<InMemoryRecordStore>,
    ) -> AgoraService<InMemoryRecordStore> {
        crate::init_test_telemetry();
        let service = AgoraService::new(store);
        service.init_admin(FOUNDER).await.unwrap();
        service.init_protocol(FOUNDER).await.unwrap();
        service.add_fee_asset(FOUNDER, TOKEN, 9).await.unwrap();
        service.init_area(FOUNDER, area()).await.unwrap();
        service
            .create_section(FOUNDER, TOKEN, area(), section())
            .await
            .unwrap();
        service
    }

    // =============================================================================
    // GOVERNANCE TESTS
    // =============================================================================

    #[tokio::test]
    async fn test_ceo_succession_moves_every_admin_gate() {
        let store = Arc::new(InMemoryRecordStore::new());
        let service = bootstrapped(store).await;

        service.pass_on_ceo(FOUNDER, HEIR).await.unwrap();

        // The founder lost every privileged operation.
        assert!(matches!(
            service.add_fee_asset(FOUNDER, UNKNOWN, 6).await,
            Err(ProtocolError::Unauthorized { .. })
        ));
        assert!(matches!(
            service
                .set_section_disabled(FOUNDER, area(), section(), true)
                .await,
            Err(ProtocolError::Unauthorized { .. })
        ));
        assert!(matches!(
            service.pass_on_ceo(FOUNDER, FOUNDER).await,
            Err(ProtocolError::Unauthorized { .. })
        ));

        // The heir holds them all, including passing the role back.
        service.add_fee_asset(HEIR, UNKNOWN, 6).await.unwrap();
        service.pass_on_ceo(HEIR, FOUNDER).await.unwrap();
        service.remove_fee_asset(FOUNDER, UNKNOWN).await.unwrap();
    }

    #[tokio::test]
    async fn test_every_vote_path_requires_a_registered_asset() {
        let store = Arc::new(InMemoryRecordStore::new());
        let service = bootstrapped(store).await;

        let comment = service
            .post_comment(ALICE, TOKEN, area(), section(), "vote on me".into())
            .await
            .unwrap();
        let target = PostLocator {
            area: area(),
            section: section(),
            level: comment.level,
            owner: ALICE,
            position: comment.author_post_position,
        };
        let poll = service.create_poll(FOUNDER, "priorities".into()).await.unwrap();
        let option = service
            .create_poll_option(FOUNDER, poll.index, "threads".into())
            .await
            .unwrap();

        for result in [
            service
                .vote_on_post(ALICE, UNKNOWN, target.clone(), 400)
                .await,
            service
                .vote_on_section(ALICE, UNKNOWN, area(), section(), 400)
                .await,
            service
                .vote_poll_option(ALICE, UNKNOWN, poll.index, option.option_index, 400)
                .await,
        ] {
            assert!(matches!(
                result,
                Err(ProtocolError::PreconditionFailed { .. })
            ));
        }

        // With the registered asset all three paths apply.
        service.vote_on_post(ALICE, TOKEN, target, 400).await.unwrap();
        service
            .vote_on_section(ALICE, TOKEN, area(), section(), -400)
            .await
            .unwrap();
        service
            .vote_poll_option(ALICE, TOKEN, poll.index, option.option_index, 400)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_poll_option_vote_arithmetic() {
        let store = Arc::new(InMemoryRecordStore::new());
        let service = bootstrapped(store.clone()).await;

        let poll = service.create_poll(FOUNDER, "next feature".into()).await.unwrap();
        assert_eq!(poll.index, 0);
        let yes = service
            .create_poll_option(FOUNDER, poll.index, "yes".into())
            .await
            .unwrap();
        let no = service
            .create_poll_option(FOUNDER, poll.index, "no".into())
            .await
            .unwrap();
        assert_eq!(yes.option_index, 0);
        assert_eq!(no.option_index, 1);

        service
            .vote_poll_option(ALICE, TOKEN, poll.index, yes.option_index, 400)
            .await
            .unwrap();
        service
            .vote_poll_option(HEIR, TOKEN, poll.index, yes.option_index, 400)
            .await
            .unwrap();
        service
            .vote_poll_option(ALICE, TOKEN, poll.index, no.option_index, -400)
            .await
            .unwrap();

        let yes_key = derive_key(&EntitySeed::PollOption {
            poll_index: poll.index,
            option_index: yes.option_index,
        });
        let stored = store.get(&yes_key).unwrap().unwrap();
        let option: PollOption = bincode::deserialize(&stored.bytes).unwrap();
        assert_eq!(option.tally.up_vote_score, 800);
        assert_eq!(option.tally.up_vote_count, 2);
        assert_eq!(option.tally.down_vote_count, 0);

        let no_key = derive_key(&EntitySeed::PollOption {
            poll_index: poll.index,
            option_index: no.option_index,
        });
        let stored = store.get(&no_key).unwrap().unwrap();
        let option: PollOption = bincode::deserialize(&stored.bytes).unwrap();
        assert_eq!(option.tally.down_vote_score, 400);
        assert_eq!(option.tally.net_score(), -400);
    }

    #[tokio::test]
    async fn test_root_census_counts_each_author_once() {
        let store = Arc::new(InMemoryRecordStore::new());
        let service = bootstrapped(store.clone()).await;

        // One explicit registration, one lazy registration via first post.
        service.create_author(ALICE).await.unwrap();
        service
            .post_comment(HEIR, TOKEN, area(), section(), "lazy".into())
            .await
            .unwrap();
        // A second post by a counted author does not count again.
        service
            .post_comment(HEIR, TOKEN, area(), section(), "again".into())
            .await
            .unwrap();

        let root_key = derive_key(&EntitySeed::ProtocolRoot);
        let stored = store.get(&root_key).unwrap().unwrap();
        let root: ProtocolRoot = bincode::deserialize(&stored.bytes).unwrap();
        assert_eq!(root.author_count, 2);
        assert_eq!(root.poll_count, 0);
    }
}
