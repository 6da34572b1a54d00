//! Chapter Core - pledge requirement logic
//!
//! Pure computation over rows already aggregated by the hosted chapter
//! database:
//! - Resolves milestone targets
//! - Computes effective coffee-chat requirements and solves override offsets
//! - Orders the pledge and brother dashboard tables
//! - Encodes and decodes academic term codes
//! - Validates raw database rows at the boundary
//!
//! # Example
//!
//! ```rust
//! use chapter_core::{Milestone, Milestones, PledgeProgressRow, OverrideMap, sort_pledges};
//!
//! let milestones = Milestones::new(
//!     Milestone::new(5, 2),
//!     Milestone::new(10, 4),
//!     Milestone::new(20, 8),
//! );
//! let target = milestones.resolve("1").unwrap();
//!
//! let rows = vec![
//!     PledgeProgressRow::new("done", "Dana").with_committee_points(2).with_coffee_chats(5),
//!     PledgeProgressRow::new("late", "Zed"),
//! ];
//! let lines = sort_pledges(&rows, target, &OverrideMap::new());
//! assert_eq!(lines[0].row.name, "Zed");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod dashboard;
pub mod error;
pub mod requirements;
pub mod rows;
pub mod sorting;
pub mod term;
pub mod types;

// Re-exports for convenience
pub use config::{ChapterConfig, DatabaseConfig, LoggingConfig};
pub use dashboard::{DashboardAction, DashboardState, PledgeSort};
pub use error::{ChapterError, ConfigError, RowError, TermError};
pub use requirements::{
    effective_required, solve_offset, still_needs, still_needs_from_input, PledgeRequirements,
    COFFEE_CHATS_PER_UNEXCUSED_ABSENCE, MAX_OVERRIDE_OFFSET, MAX_STILL_NEEDS,
};
pub use rows::{RawBrotherRow, RawMilestoneRow, RawOverrideRow, RawPledgeProgressRow};
pub use sorting::{compare_brothers, compare_names, sort_brothers, sort_pledges, PledgeLine};
pub use term::{term_code_to_words, words_to_term_code, Season, Term, INVALID_TERM_CODE};
pub use types::{
    BrotherRow, CoffeeChatOverride, Milestone, MilestoneId, MilestoneTarget, Milestones,
    OverrideMap, PledgeProgressRow, Status, Uniqname,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for dashboard code
    pub use crate::{
        ChapterError, DashboardAction, DashboardState, MilestoneId, Milestones, OverrideMap,
        PledgeLine, PledgeProgressRow, PledgeRequirements, Uniqname,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
