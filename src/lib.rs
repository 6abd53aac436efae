//! Safe removal of regenerable developer caches.
//!
//! [`cleaner::Cleaner`] checks every candidate against
//! [`safety::SafetyValidator`] before deleting it and writes an append-only
//! audit trail. [`tree::TreeNode`] lets a front end browse a candidate one
//! directory level at a time.

pub mod audit;
pub mod cleaner;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod model;
pub mod safety;
pub mod tree;
pub mod walker;

pub use cleaner::{CleanSummary, Cleaner, total_size};
pub use config::Config;
pub use error::{CleanError, CleanerError, SafetyError};
pub use format::format_size;
pub use model::{CategoryType, CleanResult, ScanResult};
pub use safety::SafetyValidator;
pub use tree::TreeNode;
pub use walker::{DirectoryWalker, FsWalker};
