//! Deletion policy.
//!
//! Validation is purely lexical: nothing here touches the filesystem, so a
//! symlink inside the home directory that points at `/usr` passes. Callers
//! must not resolve links before deleting (the cleaner unlinks them instead).
//!
//! `.` and `..` are folded away before the denylists run, so `/tmp/../etc`
//! is refused as a system path. A path that still needs `..` after passing
//! every rule is refused too: the kernel resolves `..` through symlinks,
//! which can land somewhere the lexical form never mentions.

use crate::constants::{ENV_HOME, PROTECTED_PATTERNS, SYSTEM_PATHS, TEMP_ROOT};
use crate::error::SafetyError;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyValidator {
    home: Option<String>,
}

impl SafetyValidator {
    /// An empty home counts as unset; an empty prefix would admit every path.
    pub fn new(home: Option<&Path>) -> Self {
        let home = home
            .map(|h| normalize(h).to_string_lossy().into_owned())
            .filter(|h| !h.is_empty());
        Self { home }
    }

    /// Reads `HOME` once. Prefer building one validator at startup and
    /// passing it around.
    pub fn from_env() -> Self {
        let home = std::env::var_os(ENV_HOME);
        Self::new(home.as_deref().map(Path::new))
    }

    pub fn home(&self) -> Option<&str> {
        self.home.as_deref()
    }

    /// Rules run in a fixed order and the first failure wins, so a system
    /// path under `$HOME` still reports `SystemPath`.
    pub fn validate(&self, path: &Path) -> Result<(), SafetyError> {
        let original = path.to_string_lossy();
        if !original.starts_with('/') {
            return Err(SafetyError::NotAbsolute(original.into_owned()));
        }

        let normalized = normalize(path);
        let path_str = normalized.to_string_lossy();

        if let Some(prefix) = SYSTEM_PATHS
            .iter()
            .copied()
            .find(|prefix| path_str.starts_with(*prefix))
        {
            return Err(SafetyError::SystemPath {
                path: path_str.into_owned(),
                prefix,
            });
        }

        if let Some(pattern) = PROTECTED_PATTERNS
            .iter()
            .copied()
            .find(|pattern| path_str.contains(*pattern))
        {
            return Err(SafetyError::ProtectedPattern {
                path: path_str.into_owned(),
                pattern,
            });
        }

        let Some(home) = self.home.as_deref() else {
            return Err(SafetyError::HomeUnset(path_str.into_owned()));
        };

        if !(path_str.starts_with(home) || path_str.starts_with(TEMP_ROOT)) {
            return Err(SafetyError::OutsideHome(path_str.into_owned()));
        }

        if path.components().any(|c| c == Component::ParentDir) {
            return Err(SafetyError::ParentTraversal(original.into_owned()));
        }

        Ok(())
    }

    pub fn is_safe(&self, path: &Path) -> bool {
        self.validate(path).is_ok()
    }
}

/// Folds `.` and `..` without touching the filesystem. `..` at the root
/// stays at the root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other),
        }
    }
    out
}
