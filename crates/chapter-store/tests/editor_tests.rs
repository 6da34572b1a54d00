//! Override editor tests: persisted edits and rollback on failed writes

use async_trait::async_trait;
use chapter_core::{
    BrotherRow, CoffeeChatOverride, DashboardState, MilestoneId, Milestones, OverrideMap,
    PledgeProgressRow,
};
use chapter_store::{ChapterStore, DashboardLoader, OverrideEditor, StoreError};
use chapter_test_utils::{overrides, pledge, sample_milestones, seeded_store};
use mockall::mock;
use pretty_assertions::assert_eq;
use std::sync::Arc;

mock! {
    pub Store {}

    #[async_trait]
    impl ChapterStore for Store {
        async fn milestones(&self) -> Result<Milestones, StoreError>;
        async fn pledge_progress(&self, milestone: MilestoneId) -> Result<Vec<PledgeProgressRow>, StoreError>;
        async fn brothers(&self) -> Result<Vec<BrotherRow>, StoreError>;
        async fn overrides(&self) -> Result<OverrideMap, StoreError>;
        async fn upsert_override(&self, record: &CoffeeChatOverride) -> Result<(), StoreError>;
    }
}

fn failing_store(expected_uniqname: &'static str) -> MockStore {
    let mut store = MockStore::new();
    store
        .expect_upsert_override()
        .withf(move |record| record.uniqname.as_str() == expected_uniqname)
        .times(1)
        .returning(|_| {
            Err(StoreError::Status {
                status: 503,
                body: "unavailable".to_string(),
            })
        });
    store
}

#[tokio::test]
async fn edit_persists_solved_offset() {
    let store = Arc::new(seeded_store());
    let snapshot = DashboardLoader::new(store.clone())
        .load(MilestoneId::First)
        .await
        .unwrap();
    let bob = snapshot.pledge("bob").unwrap();

    let outcome = OverrideEditor::new(store.clone())
        .set_still_needs(&snapshot.state, &snapshot.milestones, bob, 2)
        .await;

    // 0 acquired + 2 still needed - 5 milestone target
    assert_eq!(outcome.result.unwrap(), -3);
    assert_eq!(outcome.state.offset_for("bob"), Some(-3));
    assert_eq!(store.overrides().await.unwrap().get("bob"), Some(&-3));

    let lines = outcome.state.visible_pledges(&snapshot.pledges, &snapshot.milestones);
    let line = lines.iter().find(|l| l.row.uniqname.as_str() == "bob").unwrap();
    assert_eq!(line.requirements.coffee_chats_needed, 2);
}

#[tokio::test]
async fn edit_accounts_for_unexcused_absences() {
    let store = Arc::new(seeded_store());
    let snapshot = DashboardLoader::new(store.clone())
        .load(MilestoneId::First)
        .await
        .unwrap();
    let dan = snapshot.pledge("dlee").unwrap();

    let outcome = OverrideEditor::new(store)
        .set_still_needs(&snapshot.state, &snapshot.milestones, dan, 1)
        .await;

    // 4 acquired + 1 - 5 target - 3 for one unexcused absence
    assert_eq!(outcome.result.unwrap(), -3);
    let lines = outcome.state.visible_pledges(&snapshot.pledges, &snapshot.milestones);
    let line = lines.iter().find(|l| l.row.uniqname.as_str() == "dlee").unwrap();
    assert_eq!(line.requirements.coffee_chats_needed, 1);
}

#[tokio::test]
async fn repeated_edits_replace_offset() {
    let store = Arc::new(seeded_store());
    let editor = OverrideEditor::new(store.clone());
    let milestones = sample_milestones();
    let row = pledge("bob", "bob", 0, 0);
    let state = DashboardState::new(MilestoneId::First);

    let first = editor.set_still_needs(&state, &milestones, &row, 2).await;
    let second = editor.set_still_needs(&first.state, &milestones, &row, 4).await;

    assert_eq!(second.result.unwrap(), -1);
    assert_eq!(store.overrides().await.unwrap().get("bob"), Some(&-1));
    assert_eq!(store.override_count(), 1);
}

#[tokio::test]
async fn negative_still_needs_clamps_to_zero() {
    let store = Arc::new(seeded_store());
    let editor = OverrideEditor::new(store);
    let row = pledge("carolw", "Carol White", 0, 1);
    let state = DashboardState::new(MilestoneId::First);

    let outcome = editor
        .set_still_needs(&state, &sample_milestones(), &row, -7)
        .await;

    assert_eq!(outcome.result.unwrap(), 1 - 5);
}

#[tokio::test]
async fn failed_write_rolls_back_to_no_override() {
    let editor = OverrideEditor::new(Arc::new(failing_store("bob")));
    let state = DashboardState::new(MilestoneId::First);
    let row = pledge("bob", "bob", 0, 0);

    let outcome = editor
        .set_still_needs(&state, &sample_milestones(), &row, 9)
        .await;

    assert!(!outcome.is_persisted());
    let err = outcome.result.unwrap_err();
    assert!(err.is_persistence());
    assert!(err.to_string().contains("bob"));
    assert_eq!(outcome.state, state);
}

#[tokio::test]
async fn failed_write_restores_previous_offset() {
    let editor = OverrideEditor::new(Arc::new(failing_store("bob")));
    let state = DashboardState::new(MilestoneId::Second).with_overrides(overrides(&[
        ("bob", 2),
        ("zkim", -1),
    ]));
    let row = pledge("bob", "bob", 0, 0);

    let outcome = editor
        .set_still_needs(&state, &sample_milestones(), &row, 0)
        .await;

    assert!(outcome.result.is_err());
    assert_eq!(outcome.state.offset_for("bob"), Some(2));
    assert_eq!(outcome.state.offset_for("zkim"), Some(-1));
    assert_eq!(outcome.state, state);
}
