//! Dashboard loader tests over the memory store and a mocked store

use async_trait::async_trait;
use chapter_core::{
    BrotherRow, CoffeeChatOverride, MilestoneId, MilestoneTarget, Milestones, OverrideMap,
    PledgeProgressRow,
};
use chapter_store::{ChapterStore, DashboardLoader, MemoryStore, StoreError};
use chapter_test_utils::{date, overrides, sample_milestones, sample_pledges, seeded_store};
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

fn names(snapshot: &chapter_store::DashboardSnapshot) -> Vec<String> {
    snapshot
        .visible_pledges()
        .iter()
        .map(|line| line.row.name.clone())
        .collect()
}

/// Store whose milestone read fails but every other read succeeds
fn store_without_milestones() -> MockStore {
    let mut store = MockStore::new();
    store.expect_milestones().returning(|| {
        Err(StoreError::Status {
            status: 500,
            body: "down".to_string(),
        })
    });
    store
        .expect_pledge_progress()
        .returning(|_| Ok(sample_pledges()));
    store
        .expect_overrides()
        .returning(|| Ok(OverrideMap::new()));
    store
}

#[tokio::test]
async fn load_orders_by_priority() {
    let loader = DashboardLoader::new(Arc::new(seeded_store()));
    let snapshot = loader.load(MilestoneId::First).await.unwrap();

    assert_eq!(snapshot.state.milestone, MilestoneId::First);
    assert_eq!(snapshot.pledges.len(), 4);
    assert_eq!(
        names(&snapshot),
        vec!["bob", "Carol White", "Dan Lee", "Zoe Kim"]
    );
}

#[tokio::test]
async fn load_reads_overrides_fresh() {
    let store = Arc::new(seeded_store().with_overrides(overrides(&[("zkim", 5)])));
    let loader = DashboardLoader::new(store.clone());

    let before = loader.load(MilestoneId::First).await.unwrap();
    assert_eq!(before.state.offset_for("zkim"), Some(5));
    // 5 + 5 = 10 required, 6 acquired
    let zoe = before
        .visible_pledges()
        .into_iter()
        .find(|line| line.row.uniqname.as_str() == "zkim")
        .unwrap();
    assert_eq!(zoe.requirements.coffee_chats_needed, 4);

    store
        .upsert_override(&CoffeeChatOverride::new("zkim", 0))
        .await
        .unwrap();
    let after = loader.load(MilestoneId::First).await.unwrap();
    assert_eq!(after.state.offset_for("zkim"), Some(0));
}

#[tokio::test]
async fn load_current_picks_milestone_by_date() {
    let loader = DashboardLoader::new(Arc::new(seeded_store()));

    let early = loader.load_current(date(2024, 9, 15)).await.unwrap();
    assert_eq!(early.state.milestone, MilestoneId::First);

    let middle = loader.load_current(date(2024, 10, 15)).await.unwrap();
    assert_eq!(middle.state.milestone, MilestoneId::Second);

    let late = loader.load_current(date(2025, 1, 10)).await.unwrap();
    assert_eq!(late.state.milestone, MilestoneId::Final);
}

#[tokio::test]
async fn load_falls_back_to_configured_milestones() {
    let loader = DashboardLoader::new(Arc::new(store_without_milestones()))
        .with_fallback_milestones(Some(sample_milestones()));

    let snapshot = loader.load(MilestoneId::Second).await.unwrap();
    assert_eq!(
        snapshot.milestones.target(MilestoneId::Second),
        MilestoneTarget { cc: 10, cp: 4 }
    );
}

#[tokio::test]
async fn load_without_fallback_propagates_failure() {
    let loader = DashboardLoader::new(Arc::new(store_without_milestones()));

    let err = loader.load(MilestoneId::First).await.unwrap_err();
    assert!(matches!(err, StoreError::Status { status: 500, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn pledge_read_failure_fails_the_load() {
    let mut store = MockStore::new();
    store
        .expect_milestones()
        .returning(|| Ok(sample_milestones()));
    store
        .expect_pledge_progress()
        .returning(|_| Err(StoreError::Decode("pledge_progress: bad json".to_string())));
    store
        .expect_overrides()
        .returning(|| Ok(OverrideMap::new()));

    let err = DashboardLoader::new(Arc::new(store))
        .load(MilestoneId::First)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Decode(_)));
}

#[tokio::test]
async fn empty_milestone_loads_empty_dashboard() {
    let loader = DashboardLoader::new(Arc::new(MemoryStore::new(sample_milestones())));
    let snapshot = loader.load(MilestoneId::Final).await.unwrap();
    assert!(snapshot.pledges.is_empty());
    assert!(snapshot.visible_pledges().is_empty());
}

#[tokio::test]
async fn brothers_come_back_sorted() {
    let loader = DashboardLoader::new(Arc::new(seeded_store()));
    let names: Vec<String> = loader
        .brothers()
        .await
        .unwrap()
        .into_iter()
        .map(|row| row.name)
        .collect();
    assert_eq!(names, vec!["Sam", "ann", "Abe"]);
}
