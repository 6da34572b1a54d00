//! Testing utilities for the chapter workspace
//!
//! Shared fixtures: a pledge cohort's milestones, a small pledge class and
//! brother roster, and a memory store seeded with them.

#![allow(missing_docs)]

use chapter_core::{
    BrotherRow, Milestone, MilestoneId, Milestones, OverrideMap, PledgeProgressRow, Status,
};
use chapter_store::MemoryStore;
use chrono::NaiveDate;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Milestones 5/2, 10/4, 20/8 due three weeks apart in Fall 2024
pub fn sample_milestones() -> Milestones {
    Milestones::new(
        Milestone::new(5, 2).with_due_date(date(2024, 10, 1)),
        Milestone::new(10, 4).with_due_date(date(2024, 10, 22)),
        Milestone::new(20, 8).with_due_date(date(2024, 11, 12)),
    )
}

pub fn pledge(uniqname: &str, name: &str, committee_points: u32, coffee_chats: u32) -> PledgeProgressRow {
    PledgeProgressRow::new(uniqname, name)
        .with_committee_points(committee_points)
        .with_coffee_chats(coffee_chats)
}

/// Four pledges spanning 0, 1 and 2 unmet requirements at milestone 1
pub fn sample_pledges() -> Vec<PledgeProgressRow> {
    vec![
        pledge("zkim", "Zoe Kim", 3, 6).with_status(Status::Completed),
        pledge("bob", "bob", 0, 0).with_status(Status::Late),
        pledge("carolw", "Carol White", 0, 1).with_status(Status::Late),
        pledge("dlee", "Dan Lee", 2, 4)
            .with_absences(1, 0)
            .with_status(Status::OnTrack),
    ]
}

pub fn sample_brothers() -> Vec<BrotherRow> {
    vec![
        BrotherRow::new("old", "Abe").with_active(false).with_status(Status::Completed),
        BrotherRow::new("sam", "Sam").with_status(Status::Late),
        BrotherRow::new("ann", "ann").with_status(Status::OnTrack),
    ]
}

/// Memory store holding the sample cohort for every milestone
pub fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new(sample_milestones()).with_brothers(sample_brothers());
    for id in MilestoneId::ALL {
        store.set_pledges(id, sample_pledges());
    }
    store
}

pub fn overrides(entries: &[(&str, i64)]) -> OverrideMap {
    entries
        .iter()
        .map(|(uniqname, offset)| ((*uniqname).into(), *offset))
        .collect()
}

pub fn sample_pledges_json() -> serde_json::Value {
    serde_json::json!([
        {
            "uniqname": "zkim",
            "name": "Zoe Kim",
            "total_committee_points": 3,
            "coffee_chats": {"acquired": 6},
            "unexcused_absences": 0,
            "excused_absences": 1,
            "status": "completed"
        },
        {
            "uniqname": "bob",
            "name": "bob",
            "total_committee_points": 0,
            "coffee_chats": {"acquired": 0},
            "status": "late"
        }
    ])
}
