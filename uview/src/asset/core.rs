//! The immutable asset value.

use std::fmt;
use std::hash::{Hash, Hasher};

use bytes::Bytes;

use super::{AssetError, AssetResult, Guid};

/// A single file or directory placeholder inside a Unity package.
///
/// Payloads are held as immutable [`Bytes`]: accessors hand out read-only
/// views, so nothing outside the value can alter what a later accessor call
/// returns. Two assets compare equal when their GUIDs are equal, regardless
/// of path or payloads.
///
/// # Example
///
/// ```
/// use uview::asset::UnityAsset;
///
/// let asset = UnityAsset::create_new("Assets/Scripts/Player.cs")
///     .unwrap()
///     .with_content(b"public class Player {}".to_vec());
///
/// assert!(!asset.is_directory());
/// assert_eq!(asset.file_name(), "Player.cs");
/// assert_eq!(asset.content(), Some(&b"public class Player {}"[..]));
/// ```
#[derive(Debug, Clone)]
pub struct UnityAsset {
    guid: Guid,
    asset_path: String,
    content: Option<Bytes>,
    meta: Option<Bytes>,
    preview: Option<Bytes>,
}

impl UnityAsset {
    /// Create an asset with a known GUID and no payloads.
    ///
    /// Without content the asset is a directory placeholder; attach content
    /// with [`with_content`](Self::with_content).
    pub fn new(guid: Guid, asset_path: impl Into<String>) -> AssetResult<Self> {
        let asset_path = asset_path.into();
        if asset_path.is_empty() {
            return Err(AssetError::EmptyPath {
                guid: guid.to_string(),
            });
        }
        Ok(Self {
            guid,
            asset_path,
            content: None,
            meta: None,
            preview: None,
        })
    }

    /// Create an asset with a freshly generated GUID.
    pub fn create_new(asset_path: impl Into<String>) -> AssetResult<Self> {
        Self::new(Guid::new_random(), asset_path)
    }

    /// Return a copy of this asset carrying `content`.
    pub fn with_content(mut self, content: impl Into<Bytes>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Return a copy of this asset carrying `meta` as its `.meta` file.
    pub fn with_meta(mut self, meta: impl Into<Bytes>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    /// Return a copy of this asset carrying a preview thumbnail.
    pub fn with_preview(mut self, preview: impl Into<Bytes>) -> Self {
        self.preview = Some(preview.into());
        self
    }

    pub(crate) fn with_optional_payloads(
        mut self,
        content: Option<Bytes>,
        meta: Option<Bytes>,
        preview: Option<Bytes>,
    ) -> Self {
        self.content = content;
        self.meta = meta;
        self.preview = preview;
        self
    }

    /// The asset's GUID.
    pub fn guid(&self) -> &Guid {
        &self.guid
    }

    /// The virtual, forward-slash separated path inside the project.
    pub fn asset_path(&self) -> &str {
        &self.asset_path
    }

    /// File content, or `None` for a directory placeholder.
    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }

    /// Contents of the `.meta` sidecar, if any.
    pub fn meta(&self) -> Option<&[u8]> {
        self.meta.as_deref()
    }

    /// Preview thumbnail, if any.
    pub fn preview(&self) -> Option<&[u8]> {
        self.preview.as_deref()
    }

    /// Shared handle to the content buffer.
    ///
    /// Cloning [`Bytes`] does not copy, and the buffer cannot be mutated
    /// through the handle.
    pub fn content_bytes(&self) -> Option<Bytes> {
        self.content.clone()
    }

    /// Shared handle to the `.meta` buffer.
    pub fn meta_bytes(&self) -> Option<Bytes> {
        self.meta.clone()
    }

    /// Shared handle to the preview buffer.
    pub fn preview_bytes(&self) -> Option<Bytes> {
        self.preview.clone()
    }

    /// Directories are stored as assets without content.
    pub fn is_directory(&self) -> bool {
        self.content.is_none()
    }

    /// Last path segment, ignoring a trailing slash.
    pub fn file_name(&self) -> &str {
        let trimmed = self.asset_path.trim_end_matches('/');
        trimmed.rsplit('/').next().unwrap_or(trimmed)
    }
}

impl PartialEq for UnityAsset {
    fn eq(&self, other: &Self) -> bool {
        self.guid == other.guid
    }
}

impl Eq for UnityAsset {}

impl Hash for UnityAsset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.guid.hash(state);
    }
}

impl fmt::Display for UnityAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.asset_path, self.guid)
    }
}
