use chapter_core::{
    effective_required, solve_offset, still_needs, still_needs_from_input, MilestoneTarget,
    PledgeProgressRow, PledgeRequirements, COFFEE_CHATS_PER_UNEXCUSED_ABSENCE,
    MAX_OVERRIDE_OFFSET, MAX_STILL_NEEDS,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_effective_required_formula(
        cc in 0..100u32,
        offset in proptest::option::of(-200..200i64),
        unexcused in 0..20u32,
    ) {
        let expected = i64::from(cc)
            + offset.unwrap_or(0)
            + COFFEE_CHATS_PER_UNEXCUSED_ABSENCE * i64::from(unexcused);
        prop_assert_eq!(effective_required(cc, offset, unexcused), expected);
    }

    #[test]
    fn prop_solved_offset_reproduces_still_needs(
        wanted in 0..100i64,
        acquired in 0..100u32,
        cc in 0..100u32,
        unexcused in 0..20u32,
    ) {
        let offset = solve_offset(wanted, acquired, cc, unexcused);
        let effective = effective_required(cc, Some(offset), unexcused);
        prop_assert_eq!(still_needs(effective, acquired), wanted);
    }

    #[test]
    fn prop_negative_input_solves_like_zero(
        wanted in -100..0i64,
        acquired in 0..100u32,
        cc in 0..100u32,
        unexcused in 0..20u32,
    ) {
        prop_assert_eq!(
            solve_offset(wanted, acquired, cc, unexcused),
            solve_offset(0, acquired, cc, unexcused)
        );
    }

    #[test]
    fn prop_still_needs_never_negative(effective in -500..500i64, acquired in 0..500u32) {
        prop_assert!(still_needs(effective, acquired) >= 0);
    }

    #[test]
    fn prop_any_offset_evaluates(
        offset in any::<i64>(),
        cc in any::<u32>(),
        unexcused in any::<u32>(),
        acquired in any::<u32>(),
    ) {
        let row = PledgeProgressRow::new("p", "Pat")
            .with_coffee_chats(acquired)
            .with_absences(unexcused, 0);
        let requirements =
            PledgeRequirements::evaluate(&row, MilestoneTarget { cc, cp: 0 }, Some(offset));
        prop_assert!(requirements.required_coffee_chats >= 0);
        prop_assert!(requirements.coffee_chats_needed >= 0);
        prop_assert!(requirements.coffee_chats_needed <= requirements.required_coffee_chats);
    }

    #[test]
    fn prop_solved_offset_stays_loadable(
        wanted in any::<i64>(),
        acquired in any::<u32>(),
        cc in any::<u32>(),
        unexcused in any::<u32>(),
    ) {
        let offset = solve_offset(wanted, acquired, cc, unexcused);
        prop_assert!((-MAX_OVERRIDE_OFFSET..=MAX_OVERRIDE_OFFSET).contains(&offset));
        let effective = effective_required(cc, Some(offset), unexcused);
        prop_assert_eq!(still_needs(effective, acquired), wanted.clamp(0, MAX_STILL_NEEDS));
    }

    #[test]
    fn prop_unmet_counts_missing_requirements(
        cc_target in 0..20u32,
        cp_target in 0..10u32,
        acquired in 0..30u32,
        points in 0..15u32,
    ) {
        let row = PledgeProgressRow::new("p", "Pat")
            .with_coffee_chats(acquired)
            .with_committee_points(points);
        let requirements = PledgeRequirements::evaluate(
            &row,
            MilestoneTarget { cc: cc_target, cp: cp_target },
            None,
        );
        let expected = u8::from(acquired < cc_target) + u8::from(points < cp_target);
        prop_assert_eq!(requirements.unmet(), expected);
    }
}

#[test]
fn test_override_lowers_requirement_below_baseline() {
    // 5 + (-3) + 3 * 1
    assert_eq!(effective_required(5, Some(-3), 1), 5);
    assert_eq!(effective_required(5, Some(-20), 0), -15);
    assert_eq!(still_needs(-15, 0), 0);
}

#[test]
fn test_missing_override_means_zero_offset() {
    assert_eq!(effective_required(10, None, 2), 16);
    assert_eq!(effective_required(10, Some(0), 2), 16);
}

#[test]
fn test_extreme_offsets_saturate() {
    assert_eq!(effective_required(5, Some(i64::MAX), 0), i64::MAX);
    assert_eq!(effective_required(5, Some(i64::MIN), 2), i64::MIN + 11);
    assert_eq!(still_needs(i64::MIN, 1), 0);
    assert_eq!(still_needs(i64::MAX, 0), i64::MAX);

    let row = PledgeProgressRow::new("p", "Pat").with_coffee_chats(1);
    let requirements =
        PledgeRequirements::evaluate(&row, MilestoneTarget { cc: 0, cp: 0 }, Some(i64::MIN));
    assert_eq!(requirements.required_coffee_chats, 0);
    assert_eq!(requirements.coffee_chats_needed, 0);
    assert_eq!(requirements.offset, i64::MIN);
}

#[test]
fn test_huge_still_needs_input_is_capped() {
    let wanted = still_needs_from_input(1e19);
    assert_eq!(wanted, MAX_STILL_NEEDS);

    // 1 + cap - 5
    let offset = solve_offset(wanted, 1, 5, 0);
    assert_eq!(offset, MAX_STILL_NEEDS - 4);
    assert_eq!(still_needs(effective_required(5, Some(offset), 0), 1), MAX_STILL_NEEDS);
    assert_eq!(solve_offset(i64::MAX, 1, 5, 0), offset);
}
