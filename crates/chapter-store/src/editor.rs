//! Optimistic coffee-chat override edits
//!
//! An edit is a compensating-action pair over [`DashboardState`]:
//! 1. Solve the offset reproducing the entered "still needs" value
//! 2. Apply it to the state immediately
//! 3. Upsert it through the store
//! 4. On failure, revert to the offset the pledge had before the edit
//!
//! The returned state therefore always matches the last successfully
//! persisted offset.

use crate::error::StoreError;
use crate::store::ChapterStore;
use chapter_core::{
    solve_offset, CoffeeChatOverride, DashboardAction, DashboardState, Milestones,
    PledgeProgressRow, MAX_STILL_NEEDS,
};
use std::sync::Arc;

/// Result of one edit: the state to display next and the write outcome
#[derive(Debug)]
pub struct EditOutcome {
    /// State after the edit (rolled back on failure)
    pub state: DashboardState,
    /// Persisted offset, or the persistence failure
    pub result: Result<i64, StoreError>,
}

impl EditOutcome {
    /// Whether the write succeeded
    #[inline]
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.result.is_ok()
    }
}

/// Applies "still needs" edits with rollback on write failure
#[derive(Clone)]
pub struct OverrideEditor {
    store: Arc<dyn ChapterStore>,
}

impl std::fmt::Debug for OverrideEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverrideEditor").finish_non_exhaustive()
    }
}

impl OverrideEditor {
    /// Create editor writing through `store`
    #[inline]
    #[must_use]
    pub fn new(store: Arc<dyn ChapterStore>) -> Self {
        Self { store }
    }

    /// Set how many coffee chats `row` still needs at the selected milestone
    ///
    /// Input is clamped to `0..=MAX_STILL_NEEDS`. The solved offset replaces any
    /// previous override for the pledge.
    pub async fn set_still_needs(
        &self,
        state: &DashboardState,
        milestones: &Milestones,
        row: &PledgeProgressRow,
        new_still_needs: i64,
    ) -> EditOutcome {
        let target = milestones.target(state.milestone);
        let uniqname = row.uniqname.clone();
        let previous = state.offset_for(uniqname.as_str());
        let offset = solve_offset(
            new_still_needs,
            row.coffee_chats_acquired,
            target.cc,
            row.unexcused_absences,
        );
        tracing::debug!(
            "Solved offset {} for {} (still needs {}, previous {:?})",
            offset,
            uniqname,
            new_still_needs.clamp(0, MAX_STILL_NEEDS),
            previous
        );

        let applied = state.reduce(DashboardAction::OverrideApplied {
            uniqname: uniqname.clone(),
            offset,
        });

        let record = CoffeeChatOverride::new(uniqname.clone(), offset);
        match self.store.upsert_override(&record).await {
            Ok(()) => EditOutcome {
                state: applied,
                result: Ok(offset),
            },
            Err(err) => {
                tracing::error!("Override write for {} failed: {}", uniqname, err);
                let reverted = applied.reduce(DashboardAction::OverrideReverted {
                    uniqname: uniqname.clone(),
                    previous,
                });
                tracing::warn!("Rolled back {} to offset {:?}", uniqname, previous);
                let err = if err.is_persistence() {
                    err
                } else {
                    StoreError::persistence(&uniqname, err)
                };
                EditOutcome {
                    state: reverted,
                    result: Err(err),
                }
            }
        }
    }
}
