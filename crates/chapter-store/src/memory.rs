//! In-process store
//!
//! Backs offline dashboards built from JSON exports and tests. Overrides live
//! in a concurrent map with the same last-write-wins semantics as the hosted
//! table.

use crate::error::StoreError;
use crate::store::ChapterStore;
use async_trait::async_trait;
use chapter_core::{
    BrotherRow, CoffeeChatOverride, MilestoneId, Milestones, OverrideMap, PledgeProgressRow,
    Uniqname,
};
use dashmap::DashMap;

/// Store holding everything in memory
#[derive(Debug)]
pub struct MemoryStore {
    milestones: Milestones,
    pledges: DashMap<MilestoneId, Vec<PledgeProgressRow>>,
    brothers: Vec<BrotherRow>,
    overrides: DashMap<Uniqname, i64>,
}

impl MemoryStore {
    /// Create empty store for a cohort
    #[must_use]
    pub fn new(milestones: Milestones) -> Self {
        Self {
            milestones,
            pledges: DashMap::new(),
            brothers: Vec::new(),
            overrides: DashMap::new(),
        }
    }

    /// With brother rows
    #[inline]
    #[must_use]
    pub fn with_brothers(mut self, brothers: Vec<BrotherRow>) -> Self {
        self.brothers = brothers;
        self
    }

    /// With initial overrides
    #[must_use]
    pub fn with_overrides(self, overrides: OverrideMap) -> Self {
        for (uniqname, offset) in overrides {
            self.overrides.insert(uniqname, offset);
        }
        self
    }

    /// Replace the pledge rows for a milestone
    pub fn set_pledges(&self, milestone: MilestoneId, rows: Vec<PledgeProgressRow>) {
        self.pledges.insert(milestone, rows);
    }

    /// Number of stored override rows
    #[inline]
    #[must_use]
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}

#[async_trait]
impl ChapterStore for MemoryStore {
    async fn milestones(&self) -> Result<Milestones, StoreError> {
        Ok(self.milestones)
    }

    async fn pledge_progress(&self, milestone: MilestoneId) -> Result<Vec<PledgeProgressRow>, StoreError> {
        Ok(self
            .pledges
            .get(&milestone)
            .map(|rows| rows.value().clone())
            .unwrap_or_default())
    }

    async fn brothers(&self) -> Result<Vec<BrotherRow>, StoreError> {
        Ok(self.brothers.clone())
    }

    async fn overrides(&self) -> Result<OverrideMap, StoreError> {
        Ok(self
            .overrides
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect())
    }

    async fn upsert_override(&self, record: &CoffeeChatOverride) -> Result<(), StoreError> {
        if record.uniqname.is_empty() {
            return Err(StoreError::persistence(&record.uniqname, "empty uniqname"));
        }
        self.overrides
            .insert(record.uniqname.clone(), record.required_offset);
        Ok(())
    }
}
