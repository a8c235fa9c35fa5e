//! # Concurrency Tests
//!
//! The optimistic-commit contract under contention: two writers working
//! from the same observed counter produce exactly one winner, and heavy
//! parallel posting never tears a position or sequence allocation.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use ag_01_addressing::{derive_key, EntitySeed};
    use ag_02_author_ledger::AuthorLedger;
    use ag_04_post_store::{NestingLevel, Post, PostConfig, PostDraft};
    use ag_06_governance::ProtocolCeo;
    use ag_07_protocol::{
        AgoraApi, AgoraService, CommitError, InMemoryRecordStore, IndexKey, PostLocator,
        PostReceipt, RecordStore, StateTransition, StoreError, Versioned,
    };
    use anyhow::bail;
    use shared_types::{AccountId, AreaTag, AssetId, ProtocolError, RecordKey, SectionName};
    use tokio::task::JoinSet;

    const CEO: AccountId = AccountId([0x01; 32]);
    const ALICE: AccountId = AccountId([0xA1; 32]);
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

    /// Applies a queued transition right before the next commit it
    /// receives, standing in for a concurrent writer that wins the race
    /// inside another operation's read-then-commit window.
    struct PreemptingStore {
        inner: InMemoryRecordStore,
        pending: Mutex<Option<StateTransition>>,
    }

    impl PreemptingStore {
        fn new() -> Self {
            Self {
                inner: InMemoryRecordStore::new(),
                pending: Mutex::new(None),
            }
        }

        fn preempt_with(&self, transition: StateTransition) {
            *self.pending.lock().unwrap() = Some(transition);
        }
    }

    impl RecordStore for PreemptingStore {
        fn get(&self, key: &RecordKey) -> Result<Option<Versioned>, StoreError> {
            self.inner.get(key)
        }

        fn commit(&self, transition: StateTransition) -> Result<(), CommitError> {
            if let Some(queued) = self.pending.lock().unwrap().take() {
                self.inner.commit(queued)?;
            }
            self.inner.commit(transition)
        }

        fn scan_index(&self, index: &IndexKey) -> Result<Vec<RecordKey>, StoreError> {
            self.inner.scan_index(index)
        }
    }

    async fn bootstrapped<S: RecordStore>(store: Arc<S>) -> AgoraService<S> {
        crate::init_test_telemetry();
        let service = AgoraService::new(store);
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

    /// Posts with bounded retries; only commit races are retried.
    async fn post_with_retry(
        service: &AgoraService<InMemoryRecordStore>,
        author: AccountId,
        message: &str,
    ) -> anyhow::Result<PostReceipt> {
        for _ in 0..256 {
            match service
                .post_comment(author, TOKEN, area(), section(), message.to_string())
                .await
            {
                Ok(receipt) => return Ok(receipt),
                Err(ProtocolError::PreconditionFailed { .. }) => {
                    tokio::task::yield_now().await;
                }
                Err(other) => bail!("unexpected failure: {other}"),
            }
        }
        bail!("retry budget exhausted");
    }

    // =============================================================================
    // CONCURRENCY TESTS
    // =============================================================================

    /// Two creations prepared from the same ledger snapshot: exactly one
    /// commits, the loser is rejected wholesale, and the counter advances
    /// by exactly one.
    #[tokio::test]
    async fn test_same_counter_race_has_single_winner() {
        let store = Arc::new(InMemoryRecordStore::new());
        let service = bootstrapped(store.clone()).await;
        service
            .post_comment(ALICE, TOKEN, area(), section(), "first".into())
            .await
            .unwrap();

        // Both writers observe the ledger as it stands after one post.
        let ledger_key = derive_key(&EntitySeed::AuthorLedger { author: &ALICE });
        let observed = store.get(&ledger_key).unwrap().unwrap();
        let ledger: AuthorLedger = bincode::deserialize(&observed.bytes).unwrap();
        assert_eq!(ledger.post_and_reply_count, 1);

        let build_commit = |message: &str| {
            let claim = ledger.claim_position().unwrap();
            let mut post = Post::compose(
                &PostConfig::default(),
                PostDraft {
                    area: area(),
                    section_name: section(),
                    level: NestingLevel::Comment,
                    owner: ALICE,
                    parent: None,
                    message: message.to_string(),
                },
            )
            .unwrap();
            post.author_post_position = claim.position;
            post.sequence_id = 2;

            let post_key = derive_key(&EntitySeed::Post {
                area: &post.area,
                level_tag: post.level.tag(),
                author: &ALICE,
                position: claim.position,
            });
            let mut tx = StateTransition::new();
            tx.expect_version(ledger_key, observed.version)
                .put(ledger_key, bincode::serialize(&claim.ledger).unwrap());
            tx.expect_absent(post_key)
                .put(post_key, bincode::serialize(&post).unwrap());
            tx
        };

        store.commit(build_commit("winner")).unwrap();
        let err = store.commit(build_commit("loser")).unwrap_err();
        assert!(matches!(err, CommitError::VersionMismatch { .. }));

        // No orphan position: the counter moved from 1 to 2, once.
        let after = store.get(&ledger_key).unwrap().unwrap();
        let ledger: AuthorLedger = bincode::deserialize(&after.bytes).unwrap();
        assert_eq!(ledger.post_and_reply_count, 2);
        assert_eq!(after.version, observed.version + 1);

        let posts = service.posts_by_author(ALICE).await.unwrap();
        assert_eq!(posts.len(), 1, "manual commits bypass index appends");
    }

    /// A fee-asset removal landing between a vote's gate check and its
    /// commit makes the vote lose: the asset's version travels with the
    /// transition as an expectation.
    #[tokio::test]
    async fn test_vote_loses_to_concurrent_fee_asset_removal() {
        let store = Arc::new(PreemptingStore::new());
        let service = bootstrapped(store.clone()).await;
        let comment = service
            .post_comment(ALICE, TOKEN, area(), section(), "weigh me".into())
            .await
            .unwrap();
        let target = PostLocator {
            area: area(),
            section: section(),
            level: comment.level,
            owner: ALICE,
            position: comment.author_post_position,
        };

        let asset_key = derive_key(&EntitySeed::FeeAsset { asset: &TOKEN });
        let observed = store.get(&asset_key).unwrap().unwrap();
        let mut removal = StateTransition::new();
        removal.expect_version(asset_key, observed.version).delete(asset_key);
        store.preempt_with(removal);

        let err = service
            .vote_on_post(ALICE, TOKEN, target.clone(), 400)
            .await
            .unwrap_err();
        assert!(matches!(err, ProtocolError::PreconditionFailed { .. }));

        // The vote never landed with the unregistered weight.
        let post = service.get_post(&target).await.unwrap();
        assert_eq!(post.tally.up_vote_count, 0);
        assert_eq!(post.net_vote_score(), 0);
    }

    /// A succession landing between an admin operation's authority check
    /// and its commit makes the operation lose: the capability record's
    /// version travels with the transition as an expectation.
    #[tokio::test]
    async fn test_admin_op_loses_to_concurrent_succession() {
        let store = Arc::new(PreemptingStore::new());
        let service = bootstrapped(store.clone()).await;

        let capability_key = derive_key(&EntitySeed::ProtocolCeo);
        let observed = store.get(&capability_key).unwrap().unwrap();
        let mut succession = StateTransition::new();
        succession.expect_version(capability_key, observed.version).put(
            capability_key,
            bincode::serialize(&ProtocolCeo::new(ALICE)).unwrap(),
        );
        store.preempt_with(succession);

        let new_asset = AssetId([0x22; 32]);
        let err = service.add_fee_asset(CEO, new_asset, 6).await.unwrap_err();
        assert!(matches!(err, ProtocolError::PreconditionFailed { .. }));

        // The deposed caller registered nothing.
        let asset_key = derive_key(&EntitySeed::FeeAsset { asset: &new_asset });
        assert!(store.get(&asset_key).unwrap().is_none());
        // The new holder's authority is live.
        service.add_fee_asset(ALICE, new_asset, 6).await.unwrap();
    }

    /// Parallel posting across authors contends on the shared area board;
    /// with caller-side retries every allocation still lands dense.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_posting_keeps_allocations_dense() {
        let store = Arc::new(InMemoryRecordStore::new());
        let service = Arc::new(bootstrapped(store).await);

        let authors: Vec<AccountId> = (0..4).map(|_| AccountId(rand::random())).collect();
        let posts_per_author = 6usize;

        let mut tasks = JoinSet::new();
        for author in authors.clone() {
            let service = service.clone();
            tasks.spawn(async move {
                for n in 0..posts_per_author {
                    post_with_retry(&service, author, &format!("note {n}"))
                        .await
                        .unwrap();
                }
            });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap();
        }

        // Every author's positions are exactly {0..N-1}.
        for author in &authors {
            let ledger = service.get_author(*author).await.unwrap();
            assert_eq!(ledger.post_and_reply_count, posts_per_author as u128);

            let mine = service.posts_by_author(*author).await.unwrap();
            let positions: Vec<u128> =
                mine.iter().map(|p| p.author_post_position).collect();
            assert_eq!(positions, (0..posts_per_author as u128).collect::<Vec<_>>());
        }

        // Family sequence ids are dense and unique across all writers.
        let all = service
            .posts_by_section(area(), NestingLevel::Comment, section())
            .await
            .unwrap();
        let total = authors.len() * posts_per_author;
        assert_eq!(all.len(), total);
        let sequence_ids: Vec<u64> = all.iter().map(|p| p.sequence_id).collect();
        assert_eq!(sequence_ids, (1..=total as u64).collect::<Vec<_>>());
    }
}
