//! Error types for chapter-store

use chapter_core::{ChapterError, RowError, Uniqname};

/// Persistence and transport errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Override write failed; the displayed value must roll back
    #[error("failed to persist override for {uniqname}: {reason}")]
    Persistence {
        /// Pledge whose override was being written
        uniqname: Uniqname,
        /// Underlying failure
        reason: String,
    },

    /// Transport failure talking to the hosted database
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Hosted database answered with a non-success status
    #[error("database returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body (truncated)
        body: String,
    },

    /// Response body did not have the expected shape
    #[error("unexpected response shape: {0}")]
    Decode(String),

    /// Row failed boundary validation
    #[error("invalid row: {0}")]
    InvalidRow(#[from] RowError),

    /// Core validation failed
    #[error(transparent)]
    Chapter(#[from] ChapterError),

    /// API key environment variable not set
    #[error("missing credentials: environment variable {0} is not set")]
    MissingCredentials(String),

    /// Requested record does not exist
    #[error("not found: {0}")]
    NotFound(String),
}

impl StoreError {
    /// Wrap any error as a persistence failure for `uniqname`
    #[inline]
    pub fn persistence(uniqname: &Uniqname, reason: impl std::fmt::Display) -> Self {
        Self::Persistence {
            uniqname: uniqname.clone(),
            reason: reason.to_string(),
        }
    }

    /// Check if error is worth retrying
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(err) => err.is_timeout() || err.is_connect(),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Check if error is an override write failure
    #[inline]
    #[must_use]
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_retryability() {
        let busy = StoreError::Status {
            status: 503,
            body: String::new(),
        };
        let conflict = StoreError::Status {
            status: 409,
            body: String::new(),
        };
        assert!(busy.is_retryable());
        assert!(!conflict.is_retryable());
    }

    #[test]
    fn persistence_wrapping() {
        let err = StoreError::persistence(&"jdoe".into(), "connection reset");
        assert!(err.is_persistence());
        assert_eq!(
            err.to_string(),
            "failed to persist override for jdoe: connection reset"
        );
    }
}
