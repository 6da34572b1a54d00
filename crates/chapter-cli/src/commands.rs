//! Subcommand implementations
//!
//! Offline commands read JSON exports of the hosted tables (the same row
//! shapes the REST store receives) and run them through an in-memory store,
//! so the dashboard sees identical validation and ordering either way.

use crate::render;
use anyhow::{Context, Result};
use chapter_core::rows::{self, RawBrotherRow, RawMilestoneRow, RawOverrideRow, RawPledgeProgressRow};
use chapter_core::{
    sort_brothers, still_needs_from_input, ChapterConfig, DashboardAction, MilestoneId,
    Milestones, OverrideMap, PledgeRequirements, PledgeSort,
};
use chapter_store::{ChapterStore, DashboardLoader, MemoryStore, OverrideEditor, StoreError};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&input).with_context(|| format!("failed to parse {}", path.display()))
}

/// Load the chapter config named on the command line
///
/// # Errors
/// Unreadable, malformed or invalid config, with the path as context.
pub fn load_config(path: &Path) -> Result<ChapterConfig> {
    ChapterConfig::load(path).with_context(|| format!("failed to load config {}", path.display()))
}

/// Read milestones in either export shape
///
/// Accepts the keyed object (`{"1": {"cc": 5, "cp": 2}, ...}`) or one row per
/// milestone as stored in the milestones table.
///
/// # Errors
/// Unreadable file, malformed JSON or invalid milestone rows.
pub fn read_milestones(path: &Path) -> Result<Milestones> {
    let value: serde_json::Value = read_json(path)?;
    if value.is_array() {
        let raw: Vec<RawMilestoneRow> = serde_json::from_value(value)
            .with_context(|| format!("invalid milestone rows in {}", path.display()))?;
        Ok(rows::milestones(raw)?)
    } else {
        serde_json::from_value(value)
            .with_context(|| format!("invalid milestones in {}", path.display()))
    }
}

/// Inputs of `chapter pledges`
#[derive(Debug, Clone, Default)]
pub struct PledgesArgs {
    /// Pledge progress rows export
    pub rows: PathBuf,
    /// Milestones export
    pub milestones: PathBuf,
    /// Override rows export
    pub overrides: Option<PathBuf>,
    /// Milestone to show; the current one by due date when unset
    pub milestone: Option<MilestoneId>,
    /// Case-insensitive name or uniqname filter
    pub search: Option<String>,
    /// Row order
    pub sort: PledgeSort,
}

/// Render the pledge table from exported rows
///
/// # Errors
/// Unreadable or invalid exports.
pub async fn pledges(args: &PledgesArgs, today: NaiveDate) -> Result<String> {
    let milestones = read_milestones(&args.milestones)?;
    let raw: Vec<RawPledgeProgressRow> = read_json(&args.rows)?;
    let pledges = rows::pledge_rows(raw)
        .with_context(|| format!("invalid pledge row in {}", args.rows.display()))?;
    let overrides = match &args.overrides {
        Some(path) => {
            let raw: Vec<RawOverrideRow> = read_json(path)?;
            rows::override_map(raw)
                .with_context(|| format!("invalid override row in {}", path.display()))?
        }
        None => OverrideMap::new(),
    };

    let milestone = args.milestone.unwrap_or_else(|| milestones.current(today));
    let store = MemoryStore::new(milestones).with_overrides(overrides);
    store.set_pledges(milestone, pledges);
    let snapshot = DashboardLoader::new(Arc::new(store)).load(milestone).await?;

    let state = snapshot
        .state
        .reduce(DashboardAction::Search(args.search.clone().unwrap_or_default()))
        .reduce(DashboardAction::SortPledges(args.sort));
    let lines = state.visible_pledges(&snapshot.pledges, &snapshot.milestones);
    Ok(render::pledge_table(
        &lines,
        milestone,
        snapshot.milestones.target(milestone),
    ))
}

/// Render the brother table from exported rows
///
/// # Errors
/// Unreadable or invalid export.
pub fn brothers(path: &Path) -> Result<String> {
    let raw: Vec<RawBrotherRow> = read_json(path)?;
    let mut rows = rows::brother_rows(raw)
        .with_context(|| format!("invalid brother row in {}", path.display()))?;
    sort_brothers(&mut rows);
    Ok(render::brother_table(&rows))
}

/// Inputs of `chapter override`
#[derive(Debug, Clone)]
pub struct OverrideArgs {
    /// Pledge to edit
    pub uniqname: String,
    /// New "still needs" value as typed
    pub still_needs: f64,
    /// Milestone to edit against; the current one by due date when unset
    pub milestone: Option<MilestoneId>,
}

/// Set how many coffee chats a pledge still needs, persisting the solved offset
///
/// # Errors
/// Load failures, an unknown pledge, or a failed (rolled back) write.
pub async fn set_override(
    store: Arc<dyn ChapterStore>,
    fallback_milestones: Option<Milestones>,
    args: &OverrideArgs,
    today: NaiveDate,
) -> Result<String> {
    let loader = DashboardLoader::new(store.clone()).with_fallback_milestones(fallback_milestones);
    let snapshot = match args.milestone {
        Some(milestone) => loader.load(milestone).await?,
        None => loader.load_current(today).await?,
    };
    let milestone = snapshot.state.milestone;
    let uniqname = args.uniqname.trim();
    let row = snapshot.pledge(uniqname).ok_or_else(|| {
        StoreError::NotFound(format!("pledge {uniqname} at milestone {milestone}"))
    })?;

    let outcome = OverrideEditor::new(store)
        .set_still_needs(
            &snapshot.state,
            &snapshot.milestones,
            row,
            still_needs_from_input(args.still_needs),
        )
        .await;
    let offset = outcome
        .result
        .with_context(|| format!("override for {uniqname} was rolled back"))?;

    let requirements = PledgeRequirements::evaluate(
        row,
        snapshot.milestones.target(milestone),
        outcome.state.offset_for(uniqname),
    );
    Ok(format!(
        "{uniqname} needs {} more coffee chats for milestone {milestone} (required {}, offset {offset})",
        requirements.coffee_chats_needed, requirements.required_coffee_chats
    ))
}
