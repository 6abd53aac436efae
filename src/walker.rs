use crate::model::{CategoryType, ScanResult, display_name};
use crate::safety::SafetyValidator;
use crate::tree::TreeNode;
use jwalk::WalkDir;
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Measurement {
    pub size: u64,
    pub file_count: u64,
}

/// Total bytes and number of regular files under `path`. Symlinks are not
/// followed and unreadable entries are skipped.
pub fn measure(path: &Path) -> Measurement {
    let mut total = Measurement::default();

    // Serial per item; callers parallelize across items.
    for entry in WalkDir::new(path)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(jwalk::Parallelism::Serial)
        .into_iter()
        .flatten()
    {
        if let Ok(metadata) = entry.metadata()
            && metadata.is_file()
        {
            total.size += metadata.len();
            total.file_count += 1;
        }
    }

    total
}

/// Measures an existing path into a cleanup candidate.
pub fn scan_result_for(path: &Path, category: CategoryType) -> io::Result<ScanResult> {
    fs::symlink_metadata(path)?;
    let Measurement { size, file_count } = measure(path);
    Ok(ScanResult::new(path, category, size, file_count))
}

/// Like [`scan_result_for`], but a path the validator refuses is returned
/// unmeasured (zero size) without touching the filesystem, so the cleaner
/// still reports and audits the refusal.
pub fn measure_candidate(
    path: &Path,
    category: CategoryType,
    validator: &SafetyValidator,
) -> io::Result<ScanResult> {
    if let Err(err) = validator.validate(path) {
        debug!(path = %path.display(), "not measuring refused path: {err}");
        return Ok(ScanResult::new(path, category, 0, 0));
    }
    scan_result_for(path, category)
}

/// Produces the direct children of a directory node. The tree calls this at
/// most once per node.
pub trait DirectoryWalker {
    fn read_children(&self, parent: &TreeNode) -> io::Result<Vec<TreeNode>>;
}

/// Reads one level from disk and sizes each entry in parallel. Children come
/// back largest first.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsWalker {
    pub skip_hidden: bool,
}

impl FsWalker {
    fn child_node(parent: &TreeNode, path: PathBuf) -> Option<TreeNode> {
        let metadata = fs::symlink_metadata(&path).ok()?;
        let is_dir = metadata.is_dir();
        let Measurement { size, file_count } = if is_dir {
            measure(&path)
        } else {
            Measurement {
                size: metadata.len(),
                file_count: 1,
            }
        };

        Some(TreeNode {
            name: display_name(&path),
            path,
            size,
            is_dir,
            category: parent.category,
            children: None,
            scanned: false,
            depth: parent.depth + 1,
            file_count,
        })
    }
}

impl DirectoryWalker for FsWalker {
    fn read_children(&self, parent: &TreeNode) -> io::Result<Vec<TreeNode>> {
        let entries: Vec<PathBuf> = fs::read_dir(&parent.path)?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| !(self.skip_hidden && display_name(p).starts_with('.')))
            .collect();

        let mut children: Vec<TreeNode> = entries
            .into_par_iter()
            .filter_map(|path| Self::child_node(parent, path))
            .collect();

        children.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.name.cmp(&b.name)));
        debug!(path = %parent.path.display(), children = children.len(), "read directory level");
        Ok(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs::File;
    use std::io::Write;
    use tempfile::{tempdir, tempdir_in};

    fn write_file(path: &Path, len: usize) -> Result<()> {
        let mut f = File::create(path)?;
        f.write_all(&vec![0u8; len])?;
        Ok(())
    }

    #[test]
    fn measure_counts_nested_files() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path();
        fs::create_dir_all(root.join("a/b"))?;
        write_file(&root.join("a/one.bin"), 100)?;
        write_file(&root.join("a/b/two.bin"), 200)?;
        write_file(&root.join(".hidden"), 50)?;

        assert_eq!(
            measure(root),
            Measurement {
                size: 350,
                file_count: 3
            }
        );
        Ok(())
    }

    #[test]
    fn measure_missing_path_is_zero() {
        let path = Path::new("/path/to/non/existent/devsweep_test_random_12345");
        assert_eq!(measure(path), Measurement::default());
    }

    #[test]
    fn scan_result_for_requires_existing_path() -> Result<()> {
        let dir = tempdir()?;
        let cache = dir.path().join("DerivedData");
        fs::create_dir(&cache)?;
        write_file(&cache.join("index"), 64)?;

        let result = scan_result_for(&cache, CategoryType::Xcode)?;
        assert_eq!(result.name, "DerivedData");
        assert_eq!(result.size, 64);
        assert_eq!(result.file_count, 1);

        assert!(scan_result_for(&dir.path().join("missing"), CategoryType::Xcode).is_err());
        Ok(())
    }

    #[test]
    fn refused_candidates_are_not_measured() -> Result<()> {
        // Under /tmp so the directory itself passes validation on every platform.
        let dir = tempdir_in("/tmp")?;
        let validator = SafetyValidator::new(Some(Path::new("/Users/dev")));

        // Would fail with NotFound if it were stat'ed or walked.
        let missing = Path::new("/usr/devsweep/definitely/missing");
        let result = measure_candidate(missing, CategoryType::Homebrew, &validator)?;
        assert_eq!(result.path, missing);
        assert_eq!(result.size, 0);
        assert_eq!(result.file_count, 0);

        let allowed = SafetyValidator::new(Some(dir.path()));
        write_file(&dir.path().join("blob"), 40)?;
        let measured = measure_candidate(dir.path(), CategoryType::Cache, &allowed)?;
        assert_eq!(measured.size, 40);
        let gone = dir.path().join("gone");
        assert!(measure_candidate(&gone, CategoryType::Cache, &allowed).is_err());
        Ok(())
    }

    #[test]
    fn read_children_lists_one_level_largest_first() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path();
        fs::create_dir_all(root.join("big/nested"))?;
        write_file(&root.join("big/nested/blob"), 500)?;
        write_file(&root.join("small.txt"), 10)?;
        write_file(&root.join(".dotfile"), 20)?;

        let result = ScanResult::new(root, CategoryType::Cache, 530, 3);
        let parent = TreeNode::from_scan_result(&result);

        let children = FsWalker::default().read_children(&parent)?;
        let names: Vec<&str> = children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["big", ".dotfile", "small.txt"]);
        assert!(children[0].is_dir);
        assert_eq!(children[0].size, 500);
        assert_eq!(children[0].depth, 1);
        assert!(!children[0].scanned);
        assert!(children[0].children.is_none());
        assert_eq!(children[0].category, CategoryType::Cache);

        let walker = FsWalker { skip_hidden: true };
        assert_eq!(walker.read_children(&parent)?.len(), 2);
        Ok(())
    }
}
