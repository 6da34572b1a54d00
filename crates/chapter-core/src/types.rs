//! Core types for chapter-core
//!
//! Defines the typed records the calculators operate on:
//! - Member identity and status
//! - Milestones and their targets
//! - Pledge progress and brother attendance rows
//! - Coffee-chat requirement overrides

use crate::error::ChapterError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Stable per-person identifier used as the key everywhere
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uniqname(String);

impl Uniqname {
    /// Create a uniqname, trimming surrounding whitespace
    #[inline]
    #[must_use]
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().trim().to_string())
    }

    /// Get as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if blank
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Borrow<str> for Uniqname {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Uniqname {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Uniqname {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for Uniqname {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Progress status derived by the hosted database per milestone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Behind on the current milestone
    Late,
    /// Meeting the current milestone so far
    OnTrack,
    /// All requirements met
    Completed,
    /// Any status this crate does not know about
    #[serde(other)]
    Unknown,
}

impl Status {
    /// Rank used by the brother table; unknown statuses sort last
    #[inline]
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Status::Late => 0,
            Status::OnTrack => 1,
            Status::Completed => 2,
            Status::Unknown => 99,
        }
    }

    /// Parse a database status string; anything unrecognized is `Unknown`
    #[must_use]
    pub fn from_db(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "late" => Status::Late,
            "on_track" => Status::OnTrack,
            "completed" => Status::Completed,
            _ => Status::Unknown,
        }
    }

    /// Database spelling
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Late => "late",
            Status::OnTrack => "on_track",
            Status::Completed => "completed",
            Status::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Milestone identifier ("1", "2" or "3")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MilestoneId {
    /// First milestone
    First,
    /// Second milestone
    Second,
    /// Final milestone
    Final,
}

impl MilestoneId {
    /// All milestones in due order
    pub const ALL: [MilestoneId; 3] = [MilestoneId::First, MilestoneId::Second, MilestoneId::Final];

    /// Zero-based position in due order
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            MilestoneId::First => 0,
            MilestoneId::Second => 1,
            MilestoneId::Final => 2,
        }
    }

    /// Wire identifier
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MilestoneId::First => "1",
            MilestoneId::Second => "2",
            MilestoneId::Final => "3",
        }
    }
}

impl FromStr for MilestoneId {
    type Err = ChapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(MilestoneId::First),
            "2" => Ok(MilestoneId::Second),
            "3" => Ok(MilestoneId::Final),
            other => Err(ChapterError::InvalidMilestone(other.to_string())),
        }
    }
}

impl TryFrom<String> for MilestoneId {
    type Error = ChapterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MilestoneId> for String {
    fn from(value: MilestoneId) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for MilestoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coffee-chat and committee-point targets of one milestone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MilestoneTarget {
    /// Coffee chats required
    pub cc: u32,
    /// Committee points required
    pub cp: u32,
}

/// A single milestone checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Coffee-chat target
    pub cc: u32,
    /// Committee-point target
    pub cp: u32,
    /// Due date, if configured
    #[serde(default, rename = "dueDate", alias = "due_date")]
    pub due_date: Option<NaiveDate>,
}

impl Milestone {
    /// Create milestone without a due date
    #[inline]
    #[must_use]
    pub fn new(cc: u32, cp: u32) -> Self {
        Self {
            cc,
            cp,
            due_date: None,
        }
    }

    /// With due date
    #[inline]
    #[must_use]
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Targets only
    #[inline]
    #[must_use]
    pub fn target(&self) -> MilestoneTarget {
        MilestoneTarget {
            cc: self.cc,
            cp: self.cp,
        }
    }
}

/// The three milestones of a pledge cohort, keyed "1", "2", "3" on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestones {
    /// First milestone
    #[serde(rename = "1")]
    pub first: Milestone,
    /// Second milestone
    #[serde(rename = "2")]
    pub second: Milestone,
    /// Final milestone
    #[serde(rename = "3")]
    pub last: Milestone,
}

impl Milestones {
    /// Build from the three milestones
    #[inline]
    #[must_use]
    pub fn new(first: Milestone, second: Milestone, last: Milestone) -> Self {
        Self {
            first,
            second,
            last,
        }
    }

    /// Milestone by identifier
    #[inline]
    #[must_use]
    pub fn get(&self, id: MilestoneId) -> &Milestone {
        match id {
            MilestoneId::First => &self.first,
            MilestoneId::Second => &self.second,
            MilestoneId::Final => &self.last,
        }
    }

    /// Targets for a milestone identifier
    #[inline]
    #[must_use]
    pub fn target(&self, id: MilestoneId) -> MilestoneTarget {
        self.get(id).target()
    }

    /// Resolve targets from a raw identifier
    ///
    /// # Errors
    /// `ChapterError::InvalidMilestone` unless `id` is "1", "2" or "3".
    pub fn resolve(&self, id: &str) -> Result<MilestoneTarget, ChapterError> {
        let id: MilestoneId = id.parse()?;
        Ok(self.target(id))
    }

    /// First milestone due on or after `today`, or the final one once all have passed
    ///
    /// Milestones without a due date are never considered passed.
    #[must_use]
    pub fn current(&self, today: NaiveDate) -> MilestoneId {
        MilestoneId::ALL
            .into_iter()
            .find(|id| self.get(*id).due_date.map_or(true, |due| due >= today))
            .unwrap_or(MilestoneId::Final)
    }
}

/// Aggregated progress of one pledge for a milestone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PledgeProgressRow {
    /// Identity
    pub uniqname: Uniqname,
    /// Display name
    pub name: String,
    /// Committee points earned
    pub total_committee_points: u32,
    /// Coffee chats logged
    pub coffee_chats_acquired: u32,
    /// Unexcused absences (each adds three coffee chats)
    pub unexcused_absences: u32,
    /// Excused absences
    pub excused_absences: u32,
    /// Externally derived status
    pub status: Status,
}

impl PledgeProgressRow {
    /// Create a row with zeroed counters and `on_track` status
    #[must_use]
    pub fn new(uniqname: impl Into<Uniqname>, name: impl Into<String>) -> Self {
        Self {
            uniqname: uniqname.into(),
            name: name.into(),
            total_committee_points: 0,
            coffee_chats_acquired: 0,
            unexcused_absences: 0,
            excused_absences: 0,
            status: Status::OnTrack,
        }
    }

    /// With committee points
    #[inline]
    #[must_use]
    pub fn with_committee_points(mut self, points: u32) -> Self {
        self.total_committee_points = points;
        self
    }

    /// With acquired coffee chats
    #[inline]
    #[must_use]
    pub fn with_coffee_chats(mut self, acquired: u32) -> Self {
        self.coffee_chats_acquired = acquired;
        self
    }

    /// With absences
    #[inline]
    #[must_use]
    pub fn with_absences(mut self, unexcused: u32, excused: u32) -> Self {
        self.unexcused_absences = unexcused;
        self.excused_absences = excused;
        self
    }

    /// With status
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }
}

/// Attendance summary of one brother
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrotherRow {
    /// Identity
    pub uniqname: Uniqname,
    /// Display name
    pub name: String,
    /// Whether the brother is currently active
    pub active: bool,
    /// Externally derived status
    pub status: Status,
    /// Attendance points earned
    pub attendance_points: f64,
    /// Excused absences
    pub excused_absences: u32,
    /// Unexcused absences
    pub unexcused_absences: u32,
}

impl BrotherRow {
    /// Create an active, on-track brother with no attendance recorded
    #[must_use]
    pub fn new(uniqname: impl Into<Uniqname>, name: impl Into<String>) -> Self {
        Self {
            uniqname: uniqname.into(),
            name: name.into(),
            active: true,
            status: Status::OnTrack,
            attendance_points: 0.0,
            excused_absences: 0,
            unexcused_absences: 0,
        }
    }

    /// With active flag
    #[inline]
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// With status
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }
}

/// Admin-set coffee-chat requirement offset for one pledge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoffeeChatOverride {
    /// Pledge identity (unique key)
    pub uniqname: Uniqname,
    /// Signed offset applied on top of the milestone target
    pub required_offset: i64,
}

impl CoffeeChatOverride {
    /// Create override record
    #[inline]
    #[must_use]
    pub fn new(uniqname: impl Into<Uniqname>, required_offset: i64) -> Self {
        Self {
            uniqname: uniqname.into(),
            required_offset,
        }
    }
}

/// Overrides keyed by pledge identity
pub type OverrideMap = BTreeMap<Uniqname, i64>;
