use crate::constants::{AUDIT_LOG_FILE, ENV_HOME};
use crate::error::CleanerError;
use crate::safety::SafetyValidator;
use std::path::PathBuf;

/// Settings resolved once at startup and handed to the cleaner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub home: Option<PathBuf>,
    pub dry_run: bool,
    pub log_path: Option<PathBuf>,
}

impl Config {
    /// Takes the validator's home from `HOME` only, so an unset variable
    /// stays unset instead of falling back to the passwd entry.
    pub fn from_env() -> Self {
        Self {
            home: std::env::var_os(ENV_HOME)
                .filter(|h| !h.is_empty())
                .map(PathBuf::from),
            dry_run: false,
            log_path: None,
        }
    }

    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub fn with_log_path(mut self, log_path: Option<PathBuf>) -> Self {
        if log_path.is_some() {
            self.log_path = log_path;
        }
        self
    }

    pub fn validator(&self) -> SafetyValidator {
        SafetyValidator::new(self.home.as_deref())
    }

    /// Explicit location first, then a dotfile in the home directory.
    pub fn audit_log_path(&self) -> Result<PathBuf, CleanerError> {
        if let Some(path) = &self.log_path {
            return Ok(path.clone());
        }
        self.home
            .clone()
            .or_else(dirs::home_dir)
            .map(|home| home.join(AUDIT_LOG_FILE))
            .ok_or(CleanerError::NoLogLocation)
    }
}
