//! Tree reconstruction from flat asset paths.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::{DirectoryEntry, PackageTree, TreeEntry, TreeNode};
use crate::asset::UnityAsset;

/// Normalise a path for lookup: backslashes become `/`, trailing slashes go.
pub(crate) fn normalize(path: &str) -> String {
    path.replace('\\', "/").trim_end_matches('/').to_string()
}

fn parent_of(key: &str) -> &str {
    key.rsplit_once('/').map_or("", |(parent, _)| parent)
}

struct Slot {
    key: String,
    entry: TreeEntry,
    children: Vec<usize>,
}

/// Arena of nodes; `None` as a parent means the implicit root.
#[derive(Default)]
struct Arena {
    slots: Vec<Option<Slot>>,
    roots: Vec<usize>,
    folders: HashMap<String, usize>,
}

impl Arena {
    fn push(&mut self, key: String, entry: TreeEntry, parent: Option<usize>) -> usize {
        let index = self.slots.len();
        self.slots.push(Some(Slot {
            key,
            entry,
            children: Vec::new(),
        }));
        match parent.and_then(|p| self.slots[p].as_mut()) {
            Some(parent) => parent.children.push(index),
            None => self.roots.push(index),
        }
        index
    }

    /// Resolve the folder node for `key`, synthesising missing ancestors.
    fn folder(&mut self, key: &str) -> Option<usize> {
        if key.is_empty() {
            return None;
        }
        if let Some(&index) = self.folders.get(key) {
            return Some(index);
        }
        let parent = self.folder(parent_of(key));
        let index = self.push(
            key.to_string(),
            TreeEntry::Directory(DirectoryEntry::new(key)),
            parent,
        );
        self.folders.insert(key.to_string(), index);
        Some(index)
    }

    fn add(&mut self, key: String, asset: &UnityAsset) {
        let parent = self.folder(parent_of(&key));

        if !asset.is_directory() {
            self.push(key, TreeEntry::Asset(asset.clone()), parent);
            return;
        }

        match self.folders.get(&key).copied() {
            // A synthesised folder takes on the stored directory's identity.
            Some(index) => {
                if let Some(slot) = self.slots[index].as_mut() {
                    if matches!(slot.entry, TreeEntry::Directory(_)) {
                        slot.entry = TreeEntry::Asset(asset.clone());
                    }
                }
            }
            None => {
                let index = self.push(key.clone(), TreeEntry::Asset(asset.clone()), parent);
                self.folders.insert(key, index);
            }
        }
    }

    fn into_tree(mut self) -> PackageTree {
        let roots = std::mem::take(&mut self.roots);
        PackageTree::new(materialize(&mut self.slots, roots))
    }
}

fn kind_rank(node: &TreeNode) -> u8 {
    match node.entry() {
        TreeEntry::Directory(_) => 0,
        TreeEntry::Asset(asset) if asset.is_directory() => 1,
        TreeEntry::Asset(_) => 2,
    }
}

fn node_guid(node: &TreeNode) -> Option<&str> {
    node.entry().asset().map(|asset| asset.guid().as_str())
}

fn display_order(a: &(String, TreeNode), b: &(String, TreeNode)) -> Ordering {
    a.0.cmp(&b.0)
        .then_with(|| kind_rank(&a.1).cmp(&kind_rank(&b.1)))
        .then_with(|| node_guid(&a.1).cmp(&node_guid(&b.1)))
}

fn materialize(slots: &mut [Option<Slot>], indices: Vec<usize>) -> Vec<TreeNode> {
    let mut nodes = Vec::with_capacity(indices.len());
    for index in indices {
        if let Some(slot) = slots[index].take() {
            let children = materialize(slots, slot.children);
            nodes.push((slot.key, TreeNode::new(slot.entry, children)));
        }
    }
    nodes.sort_by(display_order);
    nodes.into_iter().map(|(_, node)| node).collect()
}

/// Build the folder hierarchy for a set of assets.
///
/// The result depends only on the set of assets, not on iteration order.
/// When several stored directories normalise to the same path, the one with
/// the smallest GUID is kept; files are never merged, so two files claiming
/// the same path both appear.
///
/// # Example
///
/// ```
/// use uview::asset::UnityAsset;
/// use uview::tree::{build, TreeEntry};
///
/// let player = UnityAsset::create_new("Assets/Scripts/Player.cs")
///     .unwrap()
///     .with_content(b"class Player {}".to_vec());
/// let tree = build([&player]);
///
/// let assets = &tree.children()[0];
/// assert!(matches!(assets.entry(), TreeEntry::Directory(_)));
/// assert_eq!(assets.display_name(), "Assets");
/// assert_eq!(assets.children()[0].children()[0].display_name(), "Player.cs");
/// ```
pub fn build<'a>(assets: impl IntoIterator<Item = &'a UnityAsset>) -> PackageTree {
    let mut keyed: Vec<(String, &UnityAsset)> = assets
        .into_iter()
        .map(|asset| (normalize(asset.asset_path()), asset))
        .collect();
    keyed.sort_by(|(ka, a), (kb, b)| {
        ka.cmp(kb)
            .then_with(|| b.is_directory().cmp(&a.is_directory()))
            .then_with(|| a.guid().cmp(b.guid()))
    });

    let mut arena = Arena::default();
    for (key, asset) in keyed {
        arena.add(key, asset);
    }
    arena.into_tree()
}
