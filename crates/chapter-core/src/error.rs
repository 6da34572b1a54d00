//! Error types for chapter-core
//!
//! Provides error handling for:
//! - Milestone resolution
//! - Term code parsing and decoding
//! - Row validation at the database boundary
//! - Configuration loading

use std::path::PathBuf;

/// Main chapter-core error type
#[derive(Debug, thiserror::Error)]
pub enum ChapterError {
    /// Milestone identifier is not one of "1", "2", "3"
    #[error("invalid milestone: {0:?} (expected \"1\", \"2\" or \"3\")")]
    InvalidMilestone(String),

    /// Term string or code rejected
    #[error("invalid term: {0}")]
    InvalidTerm(#[from] TermError),

    /// Row failed boundary validation
    #[error("invalid row: {0}")]
    InvalidRow(#[from] RowError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ChapterError {
    /// Check if the error is a recoverable input validation failure
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidMilestone(_) | Self::InvalidTerm(_) | Self::InvalidRow(_)
        )
    }
}

/// Term codec errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TermError {
    /// Season token not recognized
    #[error("unknown season: {0:?}")]
    UnknownSeason(String),

    /// Input is not "<season> <year>"
    #[error("malformed term: {0:?}")]
    Malformed(String),

    /// Year outside the supported range
    #[error("year {year} outside supported range {min}..={max}")]
    YearOutOfRange {
        /// Rejected year
        year: i32,
        /// Smallest accepted year
        min: i32,
        /// Largest accepted year
        max: i32,
    },

    /// Code does not belong to the term code scheme
    #[error("term code {0} is not a valid code")]
    InvalidCode(i32),
}

/// Row validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    /// Identity column missing or blank
    #[error("row has an empty uniqname")]
    EmptyUniqname,

    /// Counter column holds a negative value
    #[error("{uniqname}: {field} is negative ({value})")]
    NegativeCount {
        /// Row identity
        uniqname: String,
        /// Column name
        field: &'static str,
        /// Offending value
        value: i64,
    },

    /// Counter column exceeds the supported range
    #[error("{uniqname}: {field} is out of range ({value})")]
    CountOutOfRange {
        /// Row identity
        uniqname: String,
        /// Column name
        field: &'static str,
        /// Offending value
        value: i64,
    },

    /// Override offset exceeds the supported magnitude
    #[error("{uniqname}: required_offset {value} is outside -{max}..={max}")]
    OffsetOutOfRange {
        /// Row identity
        uniqname: String,
        /// Offending value
        value: i64,
        /// Largest accepted magnitude
        max: i64,
    },

    /// Fractional column holds a negative or non-finite value
    #[error("{uniqname}: {field} is not a valid amount ({value})")]
    InvalidAmount {
        /// Row identity
        uniqname: String,
        /// Column name
        field: &'static str,
        /// Offending value
        value: f64,
    },

    /// Milestone table is missing an entry
    #[error("milestone {0} missing from milestone rows")]
    MissingMilestone(String),

    /// Milestone table has an entry twice
    #[error("milestone {0} appears more than once")]
    DuplicateMilestone(String),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but failed validation
    #[error("invalid config: {0}")]
    Invalid(String),
}
