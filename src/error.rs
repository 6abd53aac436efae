use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a path was refused by the safety policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SafetyError {
    #[error("path is not absolute: {0}")]
    NotAbsolute(String),

    #[error("refusing to touch system path {path} (matches {prefix})")]
    SystemPath { path: String, prefix: &'static str },

    #[error("refusing to touch protected path {path} (contains {pattern})")]
    ProtectedPattern { path: String, pattern: &'static str },

    #[error("HOME is not set, cannot verify {0}")]
    HomeUnset(String),

    #[error("path is outside the home directory and /tmp: {0}")]
    OutsideHome(String),

    #[error("path contains '..': {0}")]
    ParentTraversal(String),
}

/// Per-item failure reported in a `CleanResult`.
#[derive(Error, Debug)]
pub enum CleanError {
    #[error(transparent)]
    Safety(#[from] SafetyError),

    #[error("failed to delete {}: {source}", path.display())]
    DeletionFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not record deletion of {} in the audit log: {source}", path.display())]
    AuditWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CleanError {
    /// Safety refusals are deterministic, so running the same batch again
    /// fails the same way.
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::Safety(_))
    }
}

/// Errors that prevent a `Cleaner` from being built at all.
#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("cannot open audit log {}: {source}", path.display())]
    AuditLog {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no audit log location: pass one explicitly or set HOME")]
    NoLogLocation,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);
