//! Package management.
//!
//! [`PackageManager`] owns the catalog of one open package and is the only
//! place it is edited. It tracks whether there are unsaved changes and goes
//! through a [`PackageIo`] for all archive access:
//!
//! ```text
//!            ┌──────────────────────────────┐
//!  caller ──▶│ PackageManager               │
//!            │  catalog, modified, revision │
//!            └──────┬──────────────┬────────┘
//!                   │              │
//!            PackageIo         extract_assets
//!          (UnityPackageIo)        │
//!                   │              ▼
//!            .unitypackage    host filesystem
//! ```
//!
//! Slow operations can be moved off the caller's thread with the helpers in
//! [`background`].

pub mod background;
mod config;
mod core;
mod error;
mod extract;
mod traits;

pub use config::{ManagerConfig, DEFAULT_MAX_ASSET_SIZE};
pub use core::PackageManager;
pub use error::{ManagerError, ManagerResult};
pub use extract::extract_assets;
pub use traits::{PackageIo, UnityPackageIo};
