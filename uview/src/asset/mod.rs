//! Asset identity and value types.
//!
//! A Unity package is a flat collection of assets keyed by GUID. Each asset
//! carries the virtual path it occupies inside the target project, and up to
//! three opaque payloads:
//!
//! ```text
//! UnityAsset
//! ├── guid: Guid              primary key inside the archive
//! ├── asset_path: String      "Assets/Scripts/Player.cs"
//! ├── content: Option<Bytes>  None ⇒ directory placeholder
//! ├── meta: Option<Bytes>     sidecar .meta file
//! └── preview: Option<Bytes>  thumbnail (preview.png)
//! ```
//!
//! Assets are immutable. Editing one means building a new value with the
//! same GUID and re-inserting it into the catalog.

mod core;
mod guid;
mod meta;

use thiserror::Error;

pub use core::UnityAsset;
pub use guid::Guid;
pub use meta::default_meta;

/// Result type for asset construction.
pub type AssetResult<T> = Result<T, AssetError>;

/// Errors raised when constructing an asset from invalid parts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    /// GUIDs must be non-empty.
    #[error("asset GUID must not be empty")]
    EmptyGuid,

    /// Asset paths must be non-empty.
    #[error("asset path must not be empty (guid {guid})")]
    EmptyPath { guid: String },
}
