use crate::error::CleanerError;
use crate::format::format_size;
use chrono::Local;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// One line of the audit trail.
#[derive(Debug)]
pub enum AuditEvent<'a> {
    Refused { path: &'a Path, reason: String },
    WouldDelete { path: &'a Path, size: u64 },
    Deleting { path: &'a Path, size: u64 },
    Deleted { path: &'a Path, size: u64 },
    Failed { path: &'a Path, error: &'a io::Error },
}

impl fmt::Display for AuditEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Refused { path, reason } => {
                write!(f, "REFUSED {} ({reason})", path.display())
            }
            Self::WouldDelete { path, size } => {
                write!(f, "[DRY RUN] would delete {} ({})", path.display(), format_size(*size))
            }
            Self::Deleting { path, size } => {
                write!(f, "DELETING {} ({})", path.display(), format_size(*size))
            }
            Self::Deleted { path, size } => {
                write!(f, "DELETED {} ({})", path.display(), format_size(*size))
            }
            Self::Failed { path, error } => {
                write!(f, "FAILED {}: {error}", path.display())
            }
        }
    }
}

/// Append-only audit file. The file is opened once and never truncated.
#[derive(Debug)]
pub struct AuditLog {
    path: PathBuf,
    file: File,
}

impl AuditLog {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CleanerError> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| CleanerError::AuditLog {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes a single timestamped line.
    pub fn record(&mut self, event: &AuditEvent<'_>) -> io::Result<()> {
        let line = format!("{} {event}\n", Local::now().to_rfc3339());
        self.file.write_all(line.as_bytes())?;
        self.file.flush()
    }
}
