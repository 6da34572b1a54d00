//! Chapter configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! [database]
//! url = "https://chapter.example.supabase.co"
//! api_key_env = "CHAPTER_DB_KEY"
//!
//! [logging]
//! filter = "info,chapter_store=debug"
//! ```
//!
//! The API key is never stored in the file; `api_key_env` names the
//! environment variable holding it.

use crate::error::ConfigError;
use crate::types::Milestones;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ChapterConfig {
    /// Hosted database connection
    pub database: DatabaseConfig,
    /// Log output
    pub logging: LoggingConfig,
    /// Local milestone targets used when the hosted table cannot be read
    pub milestones: Option<Milestones>,
}

/// Hosted database connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Project base URL (without `/rest/v1`)
    pub url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Override table (unique on `uniqname`)
    pub overrides_table: String,
    /// Pledge progress view
    pub pledge_progress_view: String,
    /// Brother attendance view
    pub brother_view: String,
    /// Milestone table
    pub milestones_table: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321".to_string(),
            api_key_env: "CHAPTER_DB_KEY".to_string(),
            overrides_table: "cc_requirement_overrides".to_string(),
            pledge_progress_view: "pledge_progress".to_string(),
            brother_view: "brother_attendance".to_string(),
            milestones_table: "milestones".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl ChapterConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With database URL
    #[inline]
    #[must_use]
    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database.url = url.into();
        self
    }

    /// With log filter
    #[inline]
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.logging.filter = filter.into();
        self
    }

    /// With local milestone targets
    #[inline]
    #[must_use]
    pub fn with_milestones(mut self, milestones: Milestones) -> Self {
        self.milestones = Some(milestones);
        self
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// `ConfigError::Parse` for malformed TOML, `ConfigError::Invalid` when
    /// validation fails.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file
    ///
    /// # Errors
    /// `ConfigError::Io` if the file cannot be read, otherwise as
    /// [`ChapterConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&input)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Check required fields
    ///
    /// # Errors
    /// `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let db = &self.database;
        let required = [
            ("database.url", &db.url),
            ("database.api_key_env", &db.api_key_env),
            ("database.overrides_table", &db.overrides_table),
            ("database.pledge_progress_view", &db.pledge_progress_view),
            ("database.brother_view", &db.brother_view),
            ("database.milestones_table", &db.milestones_table),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("{field} must not be empty")));
        }
        if !(db.url.starts_with("http://") || db.url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "database.url must be an http(s) URL, got {:?}",
                db.url
            )));
        }
        if db.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "database.timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        assert!(ChapterConfig::new().validate().is_ok());
    }

    #[test]
    fn parses_partial_file() {
        let config = ChapterConfig::from_toml_str(
            r#"
            [database]
            url = "https://chapter.example.co"
            overrides_table = "overrides"

            [logging]
            json = true
            "#,
        )
        .unwrap();
        assert_eq!(config.database.url, "https://chapter.example.co");
        assert_eq!(config.database.overrides_table, "overrides");
        assert_eq!(config.database.milestones_table, "milestones");
        assert!(config.logging.json);
        assert_eq!(config.logging.filter, "info");
        assert!(config.milestones.is_none());
    }

    #[test]
    fn parses_local_milestones() {
        let config = ChapterConfig::from_toml_str(
            r#"
            [milestones.1]
            cc = 5
            cp = 2
            dueDate = "2024-10-01"

            [milestones.2]
            cc = 10
            cp = 4

            [milestones.3]
            cc = 20
            cp = 8
            "#,
        )
        .unwrap();
        let milestones = config.milestones.unwrap();
        assert_eq!(milestones.second.cc, 10);
        assert!(milestones.first.due_date.is_some());
    }

    #[test]
    fn rejects_empty_table_name() {
        let err = ChapterConfig::from_toml_str("[database]\noverrides_table = \" \"\n").unwrap_err();
        assert!(err.to_string().contains("database.overrides_table"));
    }

    #[test]
    fn rejects_non_http_url() {
        let err = ChapterConfig::new().with_database_url("ftp://x").validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = ChapterConfig::from_toml_str("[database]\ntimeout_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nfilter = \"debug\"").unwrap();
        let config = ChapterConfig::load(file.path()).unwrap();
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn load_missing_file() {
        let err = ChapterConfig::load("/nonexistent/chapter.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
