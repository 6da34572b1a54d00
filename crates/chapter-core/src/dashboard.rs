//! Dashboard state and its transitions
//!
//! The pledge dashboard keeps a selected milestone, a search filter, a sort
//! mode and the override offsets currently believed to be persisted. State is
//! immutable: every change goes through [`DashboardState::reduce`], which
//! returns the next state. Optimistic override edits are applied with
//! [`DashboardAction::OverrideApplied`] and undone with
//! [`DashboardAction::OverrideReverted`].

use crate::sorting::{pledge_lines, sort_pledges_by_name, sort_pledges_by_priority, PledgeLine};
use crate::types::{MilestoneId, Milestones, OverrideMap, PledgeProgressRow, Uniqname};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Pledge table ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PledgeSort {
    /// Most unmet requirements first, then name
    #[default]
    Priority,
    /// Case-insensitive name
    Name,
}

impl FromStr for PledgeSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "priority" => Ok(PledgeSort::Priority),
            "name" => Ok(PledgeSort::Name),
            other => Err(format!("unknown sort {other:?} (expected priority or name)")),
        }
    }
}

/// State transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardAction {
    /// Switch the milestone the table is evaluated against
    SelectMilestone(MilestoneId),
    /// Replace the search filter
    Search(String),
    /// Change the pledge ordering
    SortPledges(PledgeSort),
    /// Replace all overrides with a freshly loaded set
    OverridesLoaded(OverrideMap),
    /// Record an override offset for a pledge
    OverrideApplied {
        /// Pledge
        uniqname: Uniqname,
        /// New offset
        offset: i64,
    },
    /// Restore the offset a pledge had before a failed write
    OverrideReverted {
        /// Pledge
        uniqname: Uniqname,
        /// Offset before the edit, `None` if there was no override row
        previous: Option<i64>,
    },
}

/// Immutable dashboard state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardState {
    /// Selected milestone
    pub milestone: MilestoneId,
    /// Search filter (matched case-insensitively against name and uniqname)
    pub search: String,
    /// Pledge ordering
    pub pledge_sort: PledgeSort,
    /// Override offsets by pledge
    pub overrides: OverrideMap,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(MilestoneId::First)
    }
}

impl DashboardState {
    /// Empty state for a milestone
    #[inline]
    #[must_use]
    pub fn new(milestone: MilestoneId) -> Self {
        Self {
            milestone,
            search: String::new(),
            pledge_sort: PledgeSort::default(),
            overrides: OverrideMap::new(),
        }
    }

    /// With overrides
    #[inline]
    #[must_use]
    pub fn with_overrides(mut self, overrides: OverrideMap) -> Self {
        self.overrides = overrides;
        self
    }

    /// Offset currently recorded for a pledge
    #[inline]
    #[must_use]
    pub fn offset_for(&self, uniqname: &str) -> Option<i64> {
        self.overrides.get(uniqname).copied()
    }

    /// Apply an action, producing the next state
    #[must_use]
    pub fn reduce(&self, action: DashboardAction) -> Self {
        let mut next = self.clone();
        match action {
            DashboardAction::SelectMilestone(milestone) => next.milestone = milestone,
            DashboardAction::Search(search) => next.search = search,
            DashboardAction::SortPledges(sort) => next.pledge_sort = sort,
            DashboardAction::OverridesLoaded(overrides) => next.overrides = overrides,
            DashboardAction::OverrideApplied { uniqname, offset } => {
                next.overrides.insert(uniqname, offset);
            }
            DashboardAction::OverrideReverted { uniqname, previous } => match previous {
                Some(offset) => {
                    next.overrides.insert(uniqname, offset);
                }
                None => {
                    next.overrides.remove(&uniqname);
                }
            },
        }
        next
    }

    fn matches(&self, row: &PledgeProgressRow) -> bool {
        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || row.name.to_lowercase().contains(&needle)
            || row.uniqname.as_str().to_lowercase().contains(&needle)
    }

    /// Rows passing the search filter, evaluated and ordered for display
    #[must_use]
    pub fn visible_pledges<'a>(
        &self,
        rows: &'a [PledgeProgressRow],
        milestones: &Milestones,
    ) -> Vec<PledgeLine<'a>> {
        let target = milestones.target(self.milestone);
        let mut lines: Vec<PledgeLine<'a>> = pledge_lines(rows, target, &self.overrides)
            .into_iter()
            .filter(|line| self.matches(line.row))
            .collect();
        match self.pledge_sort {
            PledgeSort::Priority => sort_pledges_by_priority(&mut lines),
            PledgeSort::Name => sort_pledges_by_name(&mut lines),
        }
        lines
    }
}
