//! Lazily expanded directory tree for interactive browsing.
//!
//! A node's `children` is `None` until the node is expanded. After expansion
//! it is `Some`, possibly empty, and `scanned` stays true for the life of the
//! node. Rebuilding means dropping the node and making a fresh one from a new
//! `ScanResult`.
//!
//! The tree does not watch the filesystem. After deleting a path the caller
//! should drop the matching node with [`TreeNode::discard_child`].

use crate::model::{CategoryType, ScanResult};
use crate::walker::DirectoryWalker;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub is_dir: bool,
    pub category: CategoryType,
    pub children: Option<Vec<TreeNode>>,
    pub scanned: bool,
    pub depth: usize,
    pub file_count: u64,
}

impl TreeNode {
    /// Scan results are always directories, so roots start as unscanned
    /// directories at depth 0.
    pub fn from_scan_result(result: &ScanResult) -> Self {
        Self {
            path: result.path.clone(),
            name: result.name.clone(),
            size: result.size,
            is_dir: true,
            category: result.category,
            children: None,
            scanned: false,
            depth: 0,
            file_count: result.file_count,
        }
    }

    pub const fn needs_scanning(&self) -> bool {
        self.is_dir && !self.scanned
    }

    pub fn has_children(&self) -> bool {
        self.children.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Appends in the order given; the tree never sorts.
    pub fn add_child(&mut self, child: Self) {
        self.children.get_or_insert_with(Vec::new).push(child);
    }

    pub fn children(&self) -> &[Self] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Populates the children on first call and returns `true`. Later calls,
    /// and calls on files, return `false` without touching the walker. If the
    /// walker fails the node stays unscanned.
    pub fn expand<W: DirectoryWalker + ?Sized>(&mut self, walker: &W) -> io::Result<bool> {
        if !self.needs_scanning() {
            return Ok(false);
        }

        let found = walker.read_children(self)?;
        self.children.get_or_insert_with(Vec::new);
        for child in found {
            self.add_child(child);
        }
        self.scanned = true;
        Ok(true)
    }

    /// Expands this node and its descendants down to `max_depth` levels below
    /// it. Returns the number of nodes that were scanned.
    pub fn expand_to_depth<W: DirectoryWalker + ?Sized>(
        &mut self,
        walker: &W,
        max_depth: usize,
    ) -> io::Result<usize> {
        if max_depth == 0 {
            return Ok(0);
        }

        let mut scanned = usize::from(self.expand(walker)?);
        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut().filter(|c| c.is_dir) {
                scanned += child.expand_to_depth(walker, max_depth - 1)?;
            }
        }
        Ok(scanned)
    }

    /// Finds the node for `path` in this subtree, descending only through
    /// already materialized children.
    pub fn find_mut(&mut self, path: &Path) -> Option<&mut Self> {
        if self.path == path {
            return Some(self);
        }
        if !path.starts_with(&self.path) {
            return None;
        }
        self.children
            .as_mut()?
            .iter_mut()
            .find_map(|child| child.find_mut(path))
    }

    /// Removes the subtree rooted at `path` from anywhere below this node.
    /// Parent sizes are left untouched; they describe the last scan.
    pub fn discard_child(&mut self, path: &Path) -> Option<Self> {
        if !path.starts_with(&self.path) {
            return None;
        }
        let children = self.children.as_mut()?;
        if let Some(idx) = children.iter().position(|c| c.path == path) {
            return Some(children.remove(idx));
        }
        children
            .iter_mut()
            .find_map(|child| child.discard_child(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::FsWalker;
    use anyhow::Result;
    use std::cell::Cell;
    use std::fs;
    use tempfile::tempdir;

    /// Hands out a fixed list of children and counts calls.
    struct FakeWalker {
        names: Vec<&'static str>,
        calls: Cell<usize>,
    }

    impl FakeWalker {
        fn new(names: Vec<&'static str>) -> Self {
            Self {
                names,
                calls: Cell::new(0),
            }
        }
    }

    impl DirectoryWalker for FakeWalker {
        fn read_children(&self, parent: &TreeNode) -> io::Result<Vec<TreeNode>> {
            self.calls.set(self.calls.get() + 1);
            Ok(self
                .names
                .iter()
                .map(|name| TreeNode {
                    path: parent.path.join(name),
                    name: (*name).to_string(),
                    size: 1,
                    is_dir: !name.contains('.'),
                    category: parent.category,
                    children: None,
                    scanned: false,
                    depth: parent.depth + 1,
                    file_count: 1,
                })
                .collect())
        }
    }

    struct FailingWalker;

    impl DirectoryWalker for FailingWalker {
        fn read_children(&self, _parent: &TreeNode) -> io::Result<Vec<TreeNode>> {
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        }
    }

    fn root() -> TreeNode {
        TreeNode::from_scan_result(&ScanResult::new(
            "/Users/dev/Projects/app/node_modules",
            CategoryType::Node,
            4096,
            12,
        ))
    }

    #[test]
    fn root_from_scan_result_is_unscanned_directory() {
        let node = root();
        assert_eq!(node.depth, 0);
        assert!(node.is_dir);
        assert!(!node.scanned);
        assert!(!node.has_children());
        assert!(node.children.is_none());
        assert!(node.needs_scanning());
        assert_eq!(node.name, "node_modules");
        assert_eq!(node.size, 4096);
        assert_eq!(node.file_count, 12);
    }

    #[test]
    fn expansion_is_idempotent() -> Result<()> {
        let walker = FakeWalker::new(vec!["react", "lodash", "index.js"]);
        let mut node = root();

        assert!(node.expand(&walker)?);
        assert!(node.scanned);
        assert!(node.has_children());
        assert!(!node.needs_scanning());

        assert!(!node.expand(&walker)?);
        assert!(node.scanned);
        assert_eq!(walker.calls.get(), 1);

        let names: Vec<&str> = node.children().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["react", "lodash", "index.js"]);
        assert!(node.children().iter().all(|c| c.depth == 1));
        Ok(())
    }

    #[test]
    fn empty_directory_is_known_empty() -> Result<()> {
        let mut node = root();
        node.expand(&FakeWalker::new(vec![]))?;
        assert!(node.scanned);
        assert_eq!(node.children, Some(vec![]));
        assert!(!node.has_children());
        Ok(())
    }

    #[test]
    fn files_never_need_scanning() -> Result<()> {
        let walker = FakeWalker::new(vec!["x"]);
        let mut file = root();
        file.is_dir = false;

        assert!(!file.needs_scanning());
        assert!(!file.expand(&walker)?);
        assert!(file.children.is_none());
        assert_eq!(walker.calls.get(), 0);
        Ok(())
    }

    #[test]
    fn walker_error_leaves_node_unscanned() {
        let mut node = root();
        assert!(node.expand(&FailingWalker).is_err());
        assert!(!node.scanned);
        assert!(node.children.is_none());
    }

    #[test]
    fn add_child_preserves_order() {
        let mut node = root();
        for name in ["b", "a", "c"] {
            let mut child = root();
            child.name = name.to_string();
            child.depth = 1;
            node.add_child(child);
        }
        let names: Vec<&str> = node.children().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn find_and_discard_nested_nodes() -> Result<()> {
        let walker = FakeWalker::new(vec!["pkg", "README.md"]);
        let mut node = root();
        node.expand_to_depth(&walker, 2)?;

        let nested = node.path.join("pkg/pkg");
        let found = node.find_mut(&nested).expect("nested node");
        assert_eq!(found.depth, 2);
        assert!(!found.scanned);

        let removed = node.discard_child(&node.path.join("pkg")).expect("removed");
        assert!(removed.scanned);
        assert_eq!(node.children().len(), 1);
        assert!(node.find_mut(&nested).is_none());
        assert!(node.discard_child(Path::new("/elsewhere")).is_none());
        Ok(())
    }

    #[test]
    fn expand_to_depth_stops_at_limit() -> Result<()> {
        let walker = FakeWalker::new(vec!["dir", "file.txt"]);
        let mut node = root();

        assert_eq!(node.expand_to_depth(&walker, 0)?, 0);
        assert_eq!(node.expand_to_depth(&walker, 3)?, 3);
        assert_eq!(walker.calls.get(), 3);
        // Already scanned nodes are not read again.
        assert_eq!(node.expand_to_depth(&walker, 3)?, 0);
        assert_eq!(walker.calls.get(), 3);
        Ok(())
    }

    #[test]
    fn expands_real_directory() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("target/debug"))?;
        fs::write(dir.path().join("target/debug/app"), [0u8; 32])?;
        fs::create_dir(dir.path().join("empty"))?;

        let result = ScanResult::new(dir.path(), CategoryType::Rust, 32, 1);
        let mut node = TreeNode::from_scan_result(&result);
        node.expand_to_depth(&FsWalker::default(), 2)?;

        let target = node.find_mut(&dir.path().join("target")).expect("target");
        assert!(target.scanned);
        assert_eq!(target.size, 32);
        assert_eq!(target.children().len(), 1);

        let empty = node.find_mut(&dir.path().join("empty")).expect("empty");
        assert!(empty.scanned);
        assert_eq!(empty.children, Some(vec![]));
        Ok(())
    }
}
