//! Default `.meta` payloads for newly added assets.

use bytes::Bytes;

use super::Guid;

/// Unity's current `.meta` serialization version.
const META_FILE_FORMAT_VERSION: u32 = 2;

/// Build the minimal `.meta` stub Unity accepts for a new asset.
///
/// The stub references the asset's own GUID so the editor keeps the identity
/// assigned by this package when importing it.
///
/// # Example
///
/// ```
/// use uview::asset::{default_meta, Guid};
///
/// let guid = Guid::new("a1b2c3d4e5f6a7b8c9d0e1f2a3b4c5d6").unwrap();
/// let meta = default_meta(&guid);
/// assert_eq!(
///     &meta[..],
///     b"fileFormatVersion: 2\nguid: a1b2c3d4e5f6a7b8c9d0e1f2a3b4c5d6\n"
/// );
/// ```
pub fn default_meta(guid: &Guid) -> Bytes {
    Bytes::from(format!(
        "fileFormatVersion: {}\nguid: {}\n",
        META_FILE_FORMAT_VERSION, guid
    ))
}
