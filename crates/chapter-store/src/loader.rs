//! Dashboard loading
//!
//! Milestones, pledge progress and overrides are independent reads, so they
//! are issued concurrently. Overrides are read fresh on every load.

use crate::error::StoreError;
use crate::store::ChapterStore;
use chapter_core::{
    sort_brothers, BrotherRow, DashboardState, MilestoneId, Milestones, PledgeLine,
    PledgeProgressRow,
};
use chrono::NaiveDate;
use std::sync::Arc;

/// Everything the pledge dashboard renders from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSnapshot {
    /// Cohort milestones
    pub milestones: Milestones,
    /// Progress rows for `state.milestone`
    pub pledges: Vec<PledgeProgressRow>,
    /// Initial dashboard state holding the loaded overrides
    pub state: DashboardState,
}

impl DashboardSnapshot {
    /// Rows as currently filtered and ordered by `state`
    #[must_use]
    pub fn visible_pledges(&self) -> Vec<PledgeLine<'_>> {
        self.state.visible_pledges(&self.pledges, &self.milestones)
    }

    /// Progress row for a pledge
    #[must_use]
    pub fn pledge(&self, uniqname: &str) -> Option<&PledgeProgressRow> {
        self.pledges.iter().find(|row| row.uniqname.as_str() == uniqname)
    }
}

/// Loads dashboard snapshots from a store
#[derive(Clone)]
pub struct DashboardLoader {
    store: Arc<dyn ChapterStore>,
    fallback_milestones: Option<Milestones>,
}

impl std::fmt::Debug for DashboardLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardLoader")
            .field("fallback_milestones", &self.fallback_milestones)
            .finish_non_exhaustive()
    }
}

impl DashboardLoader {
    /// Create loader over a store
    #[inline]
    #[must_use]
    pub fn new(store: Arc<dyn ChapterStore>) -> Self {
        Self {
            store,
            fallback_milestones: None,
        }
    }

    /// Use these milestones when the store cannot provide them
    #[inline]
    #[must_use]
    pub fn with_fallback_milestones(mut self, milestones: Option<Milestones>) -> Self {
        self.fallback_milestones = milestones;
        self
    }

    async fn milestones(&self) -> Result<Milestones, StoreError> {
        match self.store.milestones().await {
            Ok(milestones) => Ok(milestones),
            Err(err) => match self.fallback_milestones {
                Some(fallback) => {
                    tracing::warn!("Milestone read failed ({}), using configured milestones", err);
                    Ok(fallback)
                }
                None => Err(err),
            },
        }
    }

    /// Load the dashboard for a milestone
    ///
    /// # Errors
    /// The first failing read.
    pub async fn load(&self, milestone: MilestoneId) -> Result<DashboardSnapshot, StoreError> {
        let (milestones, pledges, overrides) = futures::try_join!(
            self.milestones(),
            self.store.pledge_progress(milestone),
            self.store.overrides(),
        )?;
        tracing::info!(
            "Loaded milestone {} dashboard: {} pledges, {} overrides",
            milestone,
            pledges.len(),
            overrides.len()
        );
        Ok(DashboardSnapshot {
            milestones,
            pledges,
            state: DashboardState::new(milestone).with_overrides(overrides),
        })
    }

    /// Load the dashboard for the milestone current on `today`
    ///
    /// # Errors
    /// The first failing read.
    pub async fn load_current(&self, today: NaiveDate) -> Result<DashboardSnapshot, StoreError> {
        let milestones = self.milestones().await?;
        let milestone = milestones.current(today);
        tracing::debug!("Milestone {} is current on {}", milestone, today);
        let (pledges, overrides) = futures::try_join!(
            self.store.pledge_progress(milestone),
            self.store.overrides(),
        )?;
        Ok(DashboardSnapshot {
            milestones,
            pledges,
            state: DashboardState::new(milestone).with_overrides(overrides),
        })
    }

    /// Brother rows in table order
    ///
    /// # Errors
    /// Propagates the store read failure.
    pub async fn brothers(&self) -> Result<Vec<BrotherRow>, StoreError> {
        let mut rows = self.store.brothers().await?;
        sort_brothers(&mut rows);
        Ok(rows)
    }
}
