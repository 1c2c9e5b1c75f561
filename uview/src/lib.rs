//! UView - Unity package inspection and editing
//!
//! This library reads and writes Unity `.unitypackage` archives, keeps the
//! assets of an open package in an in-memory catalog, rebuilds the folder
//! hierarchy for display, and provides the edit operations a package editor
//! needs (add, update, remove, extract).
//!
//! ```text
//! .unitypackage ──codec──▶ AssetCatalog ──tree──▶ PackageTree
//!        ▲                      │
//!        └──────codec───────────┤
//!                               ▼
//!                        PackageManager ──▶ extracted files
//! ```
//!
//! The library logs through `tracing` and never installs a subscriber; see
//! [`logging::init`] for a ready-made one.

pub mod asset;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod logging;
pub mod manager;
pub mod tree;

pub use asset::{Guid, UnityAsset};
pub use catalog::AssetCatalog;
pub use manager::{ManagerConfig, ManagerError, ManagerResult, PackageManager};
pub use tree::{PackageTree, TreeEntry, TreeNode};
