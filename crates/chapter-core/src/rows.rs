//! Boundary validation for rows returned by the hosted database
//!
//! The database client hands back loosely shaped JSON: nullable counters,
//! nested objects and free-form status strings. Each `Raw*` record mirrors
//! that shape and converts into a typed row through `TryFrom`, so the
//! calculators only ever see validated data.

use crate::error::{ChapterError, RowError};
use crate::requirements::MAX_OVERRIDE_OFFSET;
use crate::types::{
    BrotherRow, CoffeeChatOverride, Milestone, MilestoneId, Milestones, OverrideMap,
    PledgeProgressRow, Status, Uniqname,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Nested coffee-chat aggregate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCoffeeChats {
    /// Chats logged so far
    #[serde(default)]
    pub acquired: Option<i64>,
}

/// Pledge progress row as stored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPledgeProgressRow {
    #[serde(default)]
    pub uniqname: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub total_committee_points: Option<i64>,
    #[serde(default)]
    pub coffee_chats: Option<RawCoffeeChats>,
    #[serde(default)]
    pub unexcused_absences: Option<i64>,
    #[serde(default)]
    pub excused_absences: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Brother attendance row as stored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBrotherRow {
    #[serde(default)]
    pub uniqname: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub attendance_points: Option<f64>,
    #[serde(default)]
    pub excused_absences: Option<i64>,
    #[serde(default)]
    pub unexcused_absences: Option<i64>,
}

/// Override row as stored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOverrideRow {
    #[serde(default)]
    pub uniqname: Option<String>,
    #[serde(default)]
    pub required_offset: Option<i64>,
}

/// Milestone row as stored; `milestone` may be a string or a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMilestoneRow {
    pub milestone: serde_json::Value,
    #[serde(default)]
    pub cc: Option<i64>,
    #[serde(default)]
    pub cp: Option<i64>,
    #[serde(default, alias = "dueDate")]
    pub due_date: Option<NaiveDate>,
}

fn identity(raw: Option<&str>) -> Result<Uniqname, RowError> {
    let uniqname = Uniqname::new(raw.unwrap_or_default());
    if uniqname.is_empty() {
        return Err(RowError::EmptyUniqname);
    }
    Ok(uniqname)
}

fn count(uniqname: &Uniqname, field: &'static str, value: Option<i64>) -> Result<u32, RowError> {
    let value = value.unwrap_or(0);
    if value < 0 {
        return Err(RowError::NegativeCount {
            uniqname: uniqname.to_string(),
            field,
            value,
        });
    }
    u32::try_from(value).map_err(|_| RowError::CountOutOfRange {
        uniqname: uniqname.to_string(),
        field,
        value,
    })
}

impl TryFrom<RawPledgeProgressRow> for PledgeProgressRow {
    type Error = RowError;

    fn try_from(raw: RawPledgeProgressRow) -> Result<Self, Self::Error> {
        let uniqname = identity(raw.uniqname.as_deref())?;
        let acquired = raw.coffee_chats.and_then(|cc| cc.acquired);
        Ok(Self {
            total_committee_points: count(
                &uniqname,
                "total_committee_points",
                raw.total_committee_points,
            )?,
            coffee_chats_acquired: count(&uniqname, "coffee_chats.acquired", acquired)?,
            unexcused_absences: count(&uniqname, "unexcused_absences", raw.unexcused_absences)?,
            excused_absences: count(&uniqname, "excused_absences", raw.excused_absences)?,
            status: raw.status.as_deref().map_or(Status::Unknown, Status::from_db),
            name: raw.name.unwrap_or_else(|| uniqname.to_string()),
            uniqname,
        })
    }
}

impl TryFrom<RawBrotherRow> for BrotherRow {
    type Error = RowError;

    fn try_from(raw: RawBrotherRow) -> Result<Self, Self::Error> {
        let uniqname = identity(raw.uniqname.as_deref())?;
        let attendance_points = raw.attendance_points.unwrap_or(0.0);
        if !attendance_points.is_finite() || attendance_points < 0.0 {
            return Err(RowError::InvalidAmount {
                uniqname: uniqname.to_string(),
                field: "attendance_points",
                value: attendance_points,
            });
        }
        Ok(Self {
            active: raw.active.unwrap_or(false),
            status: raw.status.as_deref().map_or(Status::Unknown, Status::from_db),
            attendance_points,
            excused_absences: count(&uniqname, "excused_absences", raw.excused_absences)?,
            unexcused_absences: count(&uniqname, "unexcused_absences", raw.unexcused_absences)?,
            name: raw.name.unwrap_or_else(|| uniqname.to_string()),
            uniqname,
        })
    }
}

impl TryFrom<RawOverrideRow> for CoffeeChatOverride {
    type Error = RowError;

    fn try_from(raw: RawOverrideRow) -> Result<Self, Self::Error> {
        let uniqname = identity(raw.uniqname.as_deref())?;
        let required_offset = raw.required_offset.unwrap_or(0);
        if !(-MAX_OVERRIDE_OFFSET..=MAX_OVERRIDE_OFFSET).contains(&required_offset) {
            return Err(RowError::OffsetOutOfRange {
                uniqname: uniqname.to_string(),
                value: required_offset,
                max: MAX_OVERRIDE_OFFSET,
            });
        }
        Ok(Self {
            uniqname,
            required_offset,
        })
    }
}

/// Validate a batch of pledge rows, failing on the first bad row
///
/// # Errors
/// The first `RowError` encountered.
pub fn pledge_rows(raw: Vec<RawPledgeProgressRow>) -> Result<Vec<PledgeProgressRow>, RowError> {
    raw.into_iter().map(PledgeProgressRow::try_from).collect()
}

/// Validate a batch of brother rows, failing on the first bad row
///
/// # Errors
/// The first `RowError` encountered.
pub fn brother_rows(raw: Vec<RawBrotherRow>) -> Result<Vec<BrotherRow>, RowError> {
    raw.into_iter().map(BrotherRow::try_from).collect()
}

/// Collapse override rows into a map; a later row for the same pledge wins
///
/// # Errors
/// The first `RowError` encountered.
pub fn override_map(raw: Vec<RawOverrideRow>) -> Result<OverrideMap, RowError> {
    let mut map = OverrideMap::new();
    for row in raw {
        let record = CoffeeChatOverride::try_from(row)?;
        map.insert(record.uniqname, record.required_offset);
    }
    Ok(map)
}

fn milestone_key(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Assemble the milestones record from one row per milestone
///
/// # Errors
/// - `ChapterError::InvalidMilestone` for an identifier other than 1, 2, 3
/// - `RowError::DuplicateMilestone` / `RowError::MissingMilestone`
/// - `RowError::NegativeCount` for negative targets
pub fn milestones(raw: Vec<RawMilestoneRow>) -> Result<Milestones, ChapterError> {
    let mut slots: [Option<Milestone>; 3] = [None, None, None];
    for row in raw {
        let key = milestone_key(&row.milestone);
        let id: MilestoneId = key.parse()?;
        let owner = Uniqname::new(format!("milestone {id}"));
        let milestone = Milestone {
            cc: count(&owner, "cc", row.cc)?,
            cp: count(&owner, "cp", row.cp)?,
            due_date: row.due_date,
        };
        let slot = &mut slots[id.index()];
        if slot.is_some() {
            return Err(RowError::DuplicateMilestone(key).into());
        }
        *slot = Some(milestone);
    }
    let [first, second, last] = slots;
    let take = |slot: Option<Milestone>, id: MilestoneId| {
        slot.ok_or_else(|| RowError::MissingMilestone(id.to_string()))
    };
    Ok(Milestones::new(
        take(first, MilestoneId::First)?,
        take(second, MilestoneId::Second)?,
        take(last, MilestoneId::Final)?,
    ))
}
