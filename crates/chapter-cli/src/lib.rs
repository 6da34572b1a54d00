//! Chapter CLI - command line front end
//!
//! - `chapter term encode|decode`: academic term codes
//! - `chapter pledges`: pledge dashboard table from JSON exports
//! - `chapter brothers`: brother attendance table from a JSON export
//! - `chapter override`: live "still needs" edit against the hosted database

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod commands;
pub mod render;
pub mod telemetry;

pub use commands::{OverrideArgs, PledgesArgs};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
