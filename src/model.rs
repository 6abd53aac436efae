use crate::error::{CleanError, UnknownCategory};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryType {
    Xcode,
    Android,
    Node,
    ReactNative,
    Flutter,
    Cache,
    Python,
    Rust,
    Go,
    Homebrew,
    Docker,
    Java,
}

impl CategoryType {
    pub const ALL: [Self; 12] = [
        Self::Xcode,
        Self::Android,
        Self::Node,
        Self::ReactNative,
        Self::Flutter,
        Self::Cache,
        Self::Python,
        Self::Rust,
        Self::Go,
        Self::Homebrew,
        Self::Docker,
        Self::Java,
    ];

    /// Short tag used on the command line and in the audit log.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Xcode => "xcode",
            Self::Android => "android",
            Self::Node => "node",
            Self::ReactNative => "react-native",
            Self::Flutter => "flutter",
            Self::Cache => "cache",
            Self::Python => "python",
            Self::Rust => "rust",
            Self::Go => "go",
            Self::Homebrew => "homebrew",
            Self::Docker => "docker",
            Self::Java => "java",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Xcode => "Xcode",
            Self::Android => "Android",
            Self::Node => "Node.js",
            Self::ReactNative => "React Native",
            Self::Flutter => "Flutter",
            Self::Cache => "Generic Cache",
            Self::Python => "Python",
            Self::Rust => "Rust",
            Self::Go => "Go",
            Self::Homebrew => "Homebrew",
            Self::Docker => "Docker",
            Self::Java => "Java",
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for CategoryType {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.tag() == wanted)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// A directory the scanner considers eligible for cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub path: PathBuf,
    pub category: CategoryType,
    pub size: u64,
    pub file_count: u64,
    pub name: String,
}

impl ScanResult {
    /// Builds a result whose display name is the final path component.
    pub fn new(
        path: impl Into<PathBuf>,
        category: CategoryType,
        size: u64,
        file_count: u64,
    ) -> Self {
        let path = path.into();
        let name = display_name(&path);
        Self {
            path,
            category,
            size,
            file_count,
            name,
        }
    }
}

/// Outcome of cleaning one `ScanResult`.
#[derive(Debug)]
pub struct CleanResult {
    pub path: PathBuf,
    pub size: u64,
    pub success: bool,
    pub error: Option<CleanError>,
    pub was_dry_run: bool,
}

impl CleanResult {
    pub(crate) fn succeeded(item: &ScanResult, was_dry_run: bool) -> Self {
        Self {
            path: item.path.clone(),
            size: item.size,
            success: true,
            error: None,
            was_dry_run,
        }
    }

    pub(crate) fn failed(item: &ScanResult, error: CleanError) -> Self {
        Self {
            path: item.path.clone(),
            size: item.size,
            success: false,
            error: Some(error),
            was_dry_run: false,
        }
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.to_string_lossy().into_owned(),
        |n| n.to_string_lossy().into_owned(),
    )
}
