//! Hierarchical view over a flat asset list.
//!
//! Packages store assets flat, keyed by GUID, with nothing but the path text
//! describing where each one sits. [`build`] reconstructs the folder
//! hierarchy for presentation:
//!
//! ```text
//! (root)
//! └── Assets/                      Directory (synthesised)
//!     ├── Scripts                  Asset (directory placeholder)
//!     │   └── Player.cs            Asset
//!     └── stone.png                Asset
//! ```
//!
//! Intermediate folders without a backing asset become
//! [`TreeEntry::Directory`] nodes. Real assets, including stored directory
//! placeholders, become [`TreeEntry::Asset`] nodes.

mod builder;
mod entry;

pub use builder::build;
pub use entry::{DirectoryEntry, TreeEntry};

/// A node in the package tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    entry: TreeEntry,
    children: Vec<TreeNode>,
}

impl TreeNode {
    pub(crate) fn new(entry: TreeEntry, children: Vec<TreeNode>) -> Self {
        Self { entry, children }
    }

    /// What this node represents.
    pub fn entry(&self) -> &TreeEntry {
        &self.entry
    }

    /// Child nodes, sorted by path.
    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    /// Whether the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Shorthand for [`TreeEntry::display_name`].
    pub fn display_name(&self) -> &str {
        self.entry.display_name()
    }

    /// Shorthand for [`TreeEntry::full_path`].
    pub fn full_path(&self) -> &str {
        self.entry.full_path()
    }

    fn walk_inner<F: FnMut(&TreeNode, usize)>(&self, depth: usize, visit: &mut F) {
        visit(self, depth);
        for child in &self.children {
            child.walk_inner(depth + 1, visit);
        }
    }
}

/// The reconstructed hierarchy. The root itself is implicit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageTree {
    children: Vec<TreeNode>,
}

impl PackageTree {
    pub(crate) fn new(children: Vec<TreeNode>) -> Self {
        Self { children }
    }

    /// Top-level nodes, sorted by path.
    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Visit every node depth-first, parents before children.
    ///
    /// Top-level nodes have depth 0.
    pub fn walk<F: FnMut(&TreeNode, usize)>(&self, mut visit: F) {
        for child in &self.children {
            child.walk_inner(0, &mut visit);
        }
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(|_, _| count += 1);
        count
    }

    /// Number of nodes backed by a real asset.
    pub fn asset_count(&self) -> usize {
        let mut count = 0;
        self.walk(|node, _| {
            if node.entry().asset().is_some() {
                count += 1;
            }
        });
        count
    }

    /// Find the first node whose normalised path equals `path`.
    ///
    /// Trailing slashes and backslashes are ignored, so `"Assets/Scripts/"`
    /// and `"Assets\\Scripts"` find the same folder.
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        let wanted = builder::normalize(path);
        let mut stack: Vec<&TreeNode> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if builder::normalize(node.full_path()) == wanted {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }
}
