//! Error types shared by the blob store, the repository and both clients.
//!
//! Lookups that miss report `NotFound` with the identifier the caller asked
//! for (before any revision was filled in). Everything else the store can
//! fail on is an I/O problem while moving blob bytes around.

use thiserror::Error;

/// Result alias used across the store.
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    /// No entry stored under the requested path or identity.
    #[error("{0} not found")]
    NotFound(String),

    /// Reading or writing blob content failed.
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        StoreError::NotFound(what.into())
    }

    pub(crate) fn io(path: &str, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_string(),
            source,
        }
    }

    /// True for the `NotFound` kind, regardless of what was missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Failure to parse a channel name or charm URL from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown channel {0:?}")]
    UnknownChannel(String),

    #[error("unknown generation version {0:?}")]
    UnknownGeneration(String),

    #[error("charm URL {0:?} has an empty name")]
    EmptyName(String),

    #[error("charm URL {0:?} has a name ending in a revision suffix")]
    AmbiguousRevision(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_request() {
        let err = StoreError::not_found("cannot retrieve \"wordpress\": charm");
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "cannot retrieve \"wordpress\": charm not found"
        );
    }

    #[test]
    fn io_is_not_a_miss() {
        let err = StoreError::io(
            "/resources/mysql",
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read"),
        );
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("/resources/mysql"));
        assert!(err.to_string().contains("short read"));
    }
}
