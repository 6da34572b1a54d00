//! Coffee-chat requirement calculator and override solver
//!
//! A pledge's coffee-chat requirement for a milestone is
//!
//! ```text
//! effective = milestone.cc + offset + 3 * unexcused_absences
//! ```
//!
//! where `offset` is the admin-set override for that pledge (zero when none
//! exists). When an admin edits the "still needs" value shown on the
//! dashboard, [`solve_offset`] computes the offset that makes the formula
//! reproduce that value exactly. The stored offset is always this solved
//! residual; edits never accumulate.

use crate::types::{MilestoneTarget, PledgeProgressRow};
use serde::{Deserialize, Serialize};

/// Coffee chats added to the requirement for every unexcused absence
pub const COFFEE_CHATS_PER_UNEXCUSED_ABSENCE: i64 = 3;

/// Largest "still needs" value accepted from an admin edit
#[allow(clippy::cast_lossless)]
pub const MAX_STILL_NEEDS: i64 = u32::MAX as i64;

/// Largest override offset magnitude accepted from the database
///
/// Covers every offset [`solve_offset`] produces for input up to
/// [`MAX_STILL_NEEDS`].
pub const MAX_OVERRIDE_OFFSET: i64 = 1 << 36;

/// Effective coffee-chat requirement
///
/// Can go negative: a sufficiently negative offset yields a negative value,
/// which every consumer treats as already satisfied. Saturates at the `i64`
/// bounds.
#[inline]
#[must_use]
pub fn effective_required(milestone_cc: u32, offset: Option<i64>, unexcused_absences: u32) -> i64 {
    i64::from(milestone_cc)
        .saturating_add(offset.unwrap_or(0))
        .saturating_add(COFFEE_CHATS_PER_UNEXCUSED_ABSENCE * i64::from(unexcused_absences))
}

/// Coffee chats still needed; never negative
#[inline]
#[must_use]
pub fn still_needs(effective_required: i64, acquired: u32) -> i64 {
    effective_required.saturating_sub(i64::from(acquired)).max(0)
}

/// Normalize an interactively entered "still needs" value
///
/// Floors fractional input and clamps it to `0..=MAX_STILL_NEEDS`.
/// Non-finite input becomes zero.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn still_needs_from_input(value: f64) -> i64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    // float-to-int `as` saturates at i64::MAX
    (value.floor() as i64).min(MAX_STILL_NEEDS)
}

/// Solve for the override offset that reproduces `new_still_needs`
///
/// `new_still_needs` is clamped to `0..=MAX_STILL_NEEDS` first. The result may be
/// negative (requirement below the milestone baseline) or positive.
#[inline]
#[must_use]
pub fn solve_offset(
    new_still_needs: i64,
    acquired: u32,
    milestone_cc: u32,
    unexcused_absences: u32,
) -> i64 {
    let new_effective =
        i64::from(acquired).saturating_add(new_still_needs.clamp(0, MAX_STILL_NEEDS));
    new_effective
        .saturating_sub(i64::from(milestone_cc))
        .saturating_sub(COFFEE_CHATS_PER_UNEXCUSED_ABSENCE * i64::from(unexcused_absences))
}

/// Requirement view of one pledge against one milestone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PledgeRequirements {
    /// Override offset applied (zero when none exists)
    pub offset: i64,
    /// Effective coffee-chat requirement, saturated at zero
    pub required_coffee_chats: i64,
    /// Coffee chats still needed
    pub coffee_chats_needed: i64,
    /// Committee-point target of the milestone
    pub required_committee_points: u32,
    /// Committee points still needed
    pub committee_points_needed: u32,
}

impl PledgeRequirements {
    /// Evaluate a row against milestone targets and its override
    #[must_use]
    pub fn evaluate(row: &PledgeProgressRow, target: MilestoneTarget, offset: Option<i64>) -> Self {
        let effective = effective_required(target.cc, offset, row.unexcused_absences);
        Self {
            offset: offset.unwrap_or(0),
            required_coffee_chats: effective.max(0),
            coffee_chats_needed: still_needs(effective, row.coffee_chats_acquired),
            required_committee_points: target.cp,
            committee_points_needed: target.cp.saturating_sub(row.total_committee_points),
        }
    }

    /// Coffee-chat requirement met
    #[inline]
    #[must_use]
    pub fn coffee_chats_met(&self) -> bool {
        self.coffee_chats_needed == 0
    }

    /// Committee-point requirement met
    #[inline]
    #[must_use]
    pub fn committee_points_met(&self) -> bool {
        self.committee_points_needed == 0
    }

    /// Number of unmet requirements among committee points and coffee chats
    #[inline]
    #[must_use]
    pub fn unmet(&self) -> u8 {
        u8::from(!self.coffee_chats_met()) + u8::from(!self.committee_points_met())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula_without_override() {
        assert_eq!(effective_required(5, None, 0), 5);
        assert_eq!(effective_required(5, None, 2), 11);
    }

    #[test]
    fn formula_with_negative_override() {
        assert_eq!(effective_required(5, Some(-2), 1), 6);
        assert_eq!(effective_required(1, Some(-10), 0), -9);
    }

    #[test]
    fn still_needs_clamps_at_zero() {
        assert_eq!(still_needs(7, 10), 0);
        assert_eq!(still_needs(-9, 0), 0);
        assert_eq!(still_needs(12, 10), 2);
    }

    #[test]
    fn solve_reproduces_entered_value() {
        // base 5, one unexcused absence, 4 acquired, admin wants 2 more
        let offset = solve_offset(2, 4, 5, 1);
        assert_eq!(offset, -2);
        let effective = effective_required(5, Some(offset), 1);
        assert_eq!(still_needs(effective, 4), 2);
    }

    #[test]
    fn solve_replaces_rather_than_accumulates() {
        let first = solve_offset(10, 0, 5, 0);
        let second = solve_offset(10, 0, 5, 0);
        assert_eq!(first, second);
        assert_eq!(first, 5);
    }

    #[test]
    fn solve_clamps_negative_input() {
        assert_eq!(solve_offset(-4, 3, 5, 0), solve_offset(0, 3, 5, 0));
        assert_eq!(solve_offset(0, 3, 5, 0), -2);
    }

    #[test]
    fn input_normalization() {
        assert_eq!(still_needs_from_input(2.9), 2);
        assert_eq!(still_needs_from_input(-1.5), 0);
        assert_eq!(still_needs_from_input(f64::NAN), 0);
        assert_eq!(still_needs_from_input(f64::INFINITY), 0);
        assert_eq!(still_needs_from_input(1e19), MAX_STILL_NEEDS);
    }

    #[test]
    fn evaluate_counts_unmet() {
        let target = MilestoneTarget { cc: 5, cp: 2 };
        let behind = PledgeProgressRow::new("a", "A");
        let done = PledgeProgressRow::new("b", "B")
            .with_committee_points(5)
            .with_coffee_chats(10);
        let chats_only = PledgeProgressRow::new("c", "C").with_committee_points(2);

        assert_eq!(PledgeRequirements::evaluate(&behind, target, None).unmet(), 2);
        assert_eq!(PledgeRequirements::evaluate(&done, target, None).unmet(), 0);
        assert_eq!(PledgeRequirements::evaluate(&chats_only, target, None).unmet(), 1);
    }

    #[test]
    fn evaluate_uses_row_override_and_absences() {
        let target = MilestoneTarget { cc: 5, cp: 0 };
        let row = PledgeProgressRow::new("a", "A")
            .with_coffee_chats(5)
            .with_absences(1, 3);

        let req = PledgeRequirements::evaluate(&row, target, None);
        assert_eq!(req.required_coffee_chats, 8);
        assert_eq!(req.coffee_chats_needed, 3);

        let req = PledgeRequirements::evaluate(&row, target, Some(-3));
        assert_eq!(req.required_coffee_chats, 5);
        assert!(req.coffee_chats_met());
        assert_eq!(req.offset, -3);
    }
}
