use crate::audit::{AuditEvent, AuditLog};
use crate::config::Config;
use crate::error::{CleanError, CleanerError};
use crate::model::{CleanResult, ScanResult};
use crate::safety::SafetyValidator;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

/// Applies the safety policy to a batch of candidates and deletes (or
/// simulates deleting) the ones that pass.
#[derive(Debug)]
pub struct Cleaner {
    validator: SafetyValidator,
    dry_run: bool,
    audit: AuditLog,
}

impl Cleaner {
    /// Fails only when the audit log cannot be opened.
    pub fn new(config: &Config) -> Result<Self, CleanerError> {
        let audit = AuditLog::open(config.audit_log_path()?)?;
        Ok(Self::with_parts(config.validator(), config.dry_run, audit))
    }

    pub fn with_parts(validator: SafetyValidator, dry_run: bool, audit: AuditLog) -> Self {
        Self {
            validator,
            dry_run,
            audit,
        }
    }

    pub const fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub const fn set_dry_run(&mut self, dry_run: bool) {
        self.dry_run = dry_run;
    }

    pub fn audit_path(&self) -> &Path {
        self.audit.path()
    }

    /// Returns one result per input, in input order. Items are processed
    /// sequentially and a failure never stops the batch.
    pub fn clean(&mut self, results: &[ScanResult]) -> Vec<CleanResult> {
        info!(
            items = results.len(),
            bytes = total_size(results),
            dry_run = self.dry_run,
            "cleaning batch"
        );
        results.iter().map(|item| self.clean_one(item)).collect()
    }

    fn clean_one(&mut self, item: &ScanResult) -> CleanResult {
        let path = item.path.as_path();

        if let Err(err) = self.validator.validate(path) {
            warn!(path = %path.display(), "refused: {err}");
            self.record_or_warn(&AuditEvent::Refused {
                path,
                reason: err.to_string(),
            });
            return CleanResult::failed(item, err.into());
        }

        if self.dry_run {
            self.record_or_warn(&AuditEvent::WouldDelete {
                path,
                size: item.size,
            });
            return CleanResult::succeeded(item, true);
        }

        // No deletion happens unless it was announced in the audit log first.
        if let Err(source) = self.audit.record(&AuditEvent::Deleting {
            path,
            size: item.size,
        }) {
            warn!(path = %path.display(), "audit log write failed: {source}");
            return CleanResult::failed(
                item,
                CleanError::AuditWrite {
                    path: item.path.clone(),
                    source,
                },
            );
        }

        match remove_path(path) {
            Ok(()) => {
                debug!(path = %path.display(), size = item.size, "deleted");
                self.record_or_warn(&AuditEvent::Deleted {
                    path,
                    size: item.size,
                });
                CleanResult::succeeded(item, false)
            }
            Err(source) => {
                warn!(path = %path.display(), "delete failed: {source}");
                self.record_or_warn(&AuditEvent::Failed {
                    path,
                    error: &source,
                });
                CleanResult::failed(
                    item,
                    CleanError::DeletionFailed {
                        path: item.path.clone(),
                        source,
                    },
                )
            }
        }
    }

    fn record_or_warn(&mut self, event: &AuditEvent<'_>) {
        if let Err(err) = self.audit.record(event) {
            warn!("audit log write failed for '{event}': {err}");
        }
    }
}

/// Removes a directory tree, or unlinks a file or symlink without
/// following it.
pub fn remove_path(path: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// Sum of candidate sizes, whatever their outcome. Used for previews.
pub fn total_size(results: &[ScanResult]) -> u64 {
    results.iter().map(|r| r.size).sum()
}

/// Counts and bytes for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub reclaimed: u64,
    pub dry_run: bool,
}

impl CleanSummary {
    pub fn from_results(results: &[CleanResult]) -> Self {
        results.iter().fold(Self::default(), |mut acc, r| {
            if r.success {
                acc.succeeded += 1;
                acc.reclaimed += r.size;
                acc.dry_run |= r.was_dry_run;
            } else {
                acc.failed += 1;
            }
            acc
        })
    }
}
