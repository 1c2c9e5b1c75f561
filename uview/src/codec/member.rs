//! Well-known files inside an asset's GUID directory.

use std::fmt;

/// One of the files Unity stores per asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Member {
    /// `pathname`: the asset's virtual path.
    Pathname,
    /// `asset`: file content.
    Asset,
    /// `asset.meta`: the `.meta` sidecar.
    Meta,
    /// `preview.png`: thumbnail.
    Preview,
}

impl Member {
    /// All members, in the order they are written.
    pub const ALL: [Member; 4] = [Self::Pathname, Self::Asset, Self::Meta, Self::Preview];

    /// File name of the member inside the GUID directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Pathname => "pathname",
            Self::Asset => "asset",
            Self::Meta => "asset.meta",
            Self::Preview => "preview.png",
        }
    }

    /// Recognise a member by file name.
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.file_name() == name)
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}
