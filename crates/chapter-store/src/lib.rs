//! Chapter Store - hosted database access
//!
//! - `ChapterStore`: async boundary to the hosted chapter database
//! - `RestStore`: REST implementation with boundary row validation
//! - `MemoryStore`: in-process implementation for offline use and tests
//! - `DashboardLoader`: concurrent dashboard reads
//! - `OverrideEditor`: optimistic override edits with rollback
//!
//! # Example
//!
//! ```rust,ignore
//! use chapter_store::{DashboardLoader, OverrideEditor, RestStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(RestStore::from_env(config.database)?);
//! let snapshot = DashboardLoader::new(store.clone()).load(MilestoneId::First).await?;
//! let row = snapshot.pledge("jdoe").unwrap();
//! let outcome = OverrideEditor::new(store)
//!     .set_still_needs(&snapshot.state, &snapshot.milestones, row, 2)
//!     .await;
//! ```

#![warn(unreachable_pub)]

pub mod editor;
pub mod error;
pub mod loader;
pub mod memory;
pub mod rest;
pub mod store;

pub use editor::{EditOutcome, OverrideEditor};
pub use error::StoreError;
pub use loader::{DashboardLoader, DashboardSnapshot};
pub use memory::MemoryStore;
pub use rest::RestStore;
pub use store::ChapterStore;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
