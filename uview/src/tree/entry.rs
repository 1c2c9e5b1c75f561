//! Tree node payloads.

use crate::asset::UnityAsset;

/// A folder synthesised to connect the hierarchy.
///
/// The path always ends with `/`, so it can be used directly as a prefix
/// when selecting or extracting everything underneath.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectoryEntry {
    path: String,
}

impl DirectoryEntry {
    pub(crate) fn new(normalized: &str) -> Self {
        Self {
            path: format!("{normalized}/"),
        }
    }

    /// Full path, with trailing slash.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last path segment.
    pub fn name(&self) -> &str {
        let trimmed = self.path.trim_end_matches('/');
        trimmed.rsplit('/').next().unwrap_or(trimmed)
    }
}

/// What a tree node stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEntry {
    /// Intermediate folder with no backing asset.
    Directory(DirectoryEntry),
    /// A real asset: a file, or a stored directory placeholder.
    Asset(UnityAsset),
}

impl TreeEntry {
    /// Full path of the entry.
    pub fn full_path(&self) -> &str {
        match self {
            Self::Directory(dir) => dir.path(),
            Self::Asset(asset) => asset.asset_path(),
        }
    }

    /// Name shown for the entry: its last path segment.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Directory(dir) => dir.name(),
            Self::Asset(asset) => asset.file_name(),
        }
    }

    /// Whether the entry is a folder, synthesised or stored.
    pub fn is_directory(&self) -> bool {
        match self {
            Self::Directory(_) => true,
            Self::Asset(asset) => asset.is_directory(),
        }
    }

    /// The backing asset, if there is one.
    pub fn asset(&self) -> Option<&UnityAsset> {
        match self {
            Self::Directory(_) => None,
            Self::Asset(asset) => Some(asset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Guid;

    #[test]
    fn test_directory_entry_names() {
        let dir = DirectoryEntry::new("Assets/Scripts");
        assert_eq!(dir.path(), "Assets/Scripts/");
        assert_eq!(dir.name(), "Scripts");

        let top = DirectoryEntry::new("Assets");
        assert_eq!(top.name(), "Assets");
    }

    #[test]
    fn test_tree_entry_accessors() {
        let asset = UnityAsset::new(Guid::new("g").unwrap(), "Assets/a.txt")
            .unwrap()
            .with_content(b"a".to_vec());
        let file = TreeEntry::Asset(asset.clone());
        let dir = TreeEntry::Directory(DirectoryEntry::new("Assets"));

        assert_eq!(file.full_path(), "Assets/a.txt");
        assert_eq!(file.display_name(), "a.txt");
        assert!(!file.is_directory());
        assert_eq!(file.asset(), Some(&asset));

        assert_eq!(dir.full_path(), "Assets/");
        assert_eq!(dir.display_name(), "Assets");
        assert!(dir.is_directory());
        assert!(dir.asset().is_none());
    }
}
