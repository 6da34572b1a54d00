//! Priority ordering for the pledge and brother dashboard tables
//!
//! Both orders are total: every key is compared and names break ties, so
//! sorting is deterministic for any input order. Rows whose names compare
//! equal keep their relative order (the sorts are stable).

use crate::requirements::PledgeRequirements;
use crate::types::{BrotherRow, MilestoneTarget, OverrideMap, PledgeProgressRow};
use std::cmp::{Ordering, Reverse};

/// Case-insensitive name comparison
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// A pledge row paired with its evaluated requirements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PledgeLine<'a> {
    /// Source row
    pub row: &'a PledgeProgressRow,
    /// Requirements evaluated with the row's own override
    pub requirements: PledgeRequirements,
}

impl<'a> PledgeLine<'a> {
    /// Evaluate one row
    #[must_use]
    pub fn evaluate(row: &'a PledgeProgressRow, target: MilestoneTarget, overrides: &OverrideMap) -> Self {
        let offset = overrides.get(row.uniqname.as_str()).copied();
        Self {
            row,
            requirements: PledgeRequirements::evaluate(row, target, offset),
        }
    }
}

/// Evaluate every row against the milestone target, keeping input order
#[must_use]
pub fn pledge_lines<'a>(
    rows: &'a [PledgeProgressRow],
    target: MilestoneTarget,
    overrides: &OverrideMap,
) -> Vec<PledgeLine<'a>> {
    rows.iter()
        .map(|row| PledgeLine::evaluate(row, target, overrides))
        .collect()
}

/// Most unmet requirements first, then case-insensitive name
#[must_use]
pub fn compare_pledge_priority(a: &PledgeLine<'_>, b: &PledgeLine<'_>) -> Ordering {
    Reverse(a.requirements.unmet())
        .cmp(&Reverse(b.requirements.unmet()))
        .then_with(|| compare_names(&a.row.name, &b.row.name))
}

/// Sort lines by priority
pub fn sort_pledges_by_priority(lines: &mut [PledgeLine<'_>]) {
    lines.sort_by(compare_pledge_priority);
}

/// Sort lines by case-insensitive name only
pub fn sort_pledges_by_name(lines: &mut [PledgeLine<'_>]) {
    lines.sort_by(|a, b| compare_names(&a.row.name, &b.row.name));
}

/// Evaluate and priority-sort in one step
#[must_use]
pub fn sort_pledges<'a>(
    rows: &'a [PledgeProgressRow],
    target: MilestoneTarget,
    overrides: &OverrideMap,
) -> Vec<PledgeLine<'a>> {
    let mut lines = pledge_lines(rows, target, overrides);
    sort_pledges_by_priority(&mut lines);
    lines
}

/// Active first, then status rank, then case-insensitive name
#[must_use]
pub fn compare_brothers(a: &BrotherRow, b: &BrotherRow) -> Ordering {
    b.active
        .cmp(&a.active)
        .then_with(|| a.status.rank().cmp(&b.status.rank()))
        .then_with(|| compare_names(&a.name, &b.name))
}

/// Sort brother rows in place
pub fn sort_brothers(rows: &mut [BrotherRow]) {
    rows.sort_by(compare_brothers);
}
