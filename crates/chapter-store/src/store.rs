//! ChapterStore trait definition
//!
//! The hosted chapter database is an external collaborator. This trait is
//! the whole surface this workspace needs from it: reads of already-aggregated
//! rows and a single upsert of coffee-chat overrides.

use crate::error::StoreError;
use async_trait::async_trait;
use chapter_core::{BrotherRow, CoffeeChatOverride, MilestoneId, Milestones, OverrideMap, PledgeProgressRow};

/// Abstract interface for chapter database access
///
/// Implementations validate rows at the boundary: everything returned here
/// is already typed and checked.
#[async_trait]
pub trait ChapterStore: Send + Sync {
    /// Milestone targets of the current cohort
    async fn milestones(&self) -> Result<Milestones, StoreError>;

    /// Pledge progress rows evaluated for a milestone
    async fn pledge_progress(&self, milestone: MilestoneId) -> Result<Vec<PledgeProgressRow>, StoreError>;

    /// Brother attendance rows
    async fn brothers(&self) -> Result<Vec<BrotherRow>, StoreError>;

    /// All coffee-chat overrides keyed by pledge
    async fn overrides(&self) -> Result<OverrideMap, StoreError>;

    /// Insert or replace the override for `record.uniqname`
    async fn upsert_override(&self, record: &CoffeeChatOverride) -> Result<(), StoreError>;
}
