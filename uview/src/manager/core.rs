//! The Package Manager: one open package and the edits made to it.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use bytes::Bytes;
use tracing::{debug, info, warn};

use super::config::ManagerConfig;
use super::error::{ManagerError, ManagerResult};
use super::extract::extract_assets;
use super::traits::{PackageIo, UnityPackageIo};
use crate::asset::{default_meta, Guid, UnityAsset};
use crate::catalog::AssetCatalog;
use crate::tree::{self, PackageTree};

/// Owns the catalog of the open package and tracks unsaved changes.
///
/// All mutation goes through `&mut self`, so one manager is edited from one
/// place at a time. Separate managers share nothing and can be used from
/// different threads freely.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use uview::manager::PackageManager;
///
/// # fn main() -> Result<(), uview::manager::ManagerError> {
/// let mut manager = PackageManager::default();
/// manager.load(Path::new("Characters.unitypackage"))?;
/// manager.remove_directory("Assets/Unused");
/// manager.save(Path::new("Characters.unitypackage"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PackageManager<I: PackageIo = UnityPackageIo> {
    io: I,
    config: ManagerConfig,
    catalog: AssetCatalog,
    modified: bool,
    revision: u64,
}

impl Default for PackageManager<UnityPackageIo> {
    fn default() -> Self {
        Self::new(UnityPackageIo, ManagerConfig::default())
    }
}

impl PackageManager<UnityPackageIo> {
    /// Manager reading and writing `.unitypackage` files with `config`.
    pub fn with_config(config: ManagerConfig) -> Self {
        Self::new(UnityPackageIo, config)
    }
}

impl<I: PackageIo> PackageManager<I> {
    /// Create a manager with an empty, unmodified catalog.
    pub fn new(io: I, config: ManagerConfig) -> Self {
        Self {
            io,
            config,
            catalog: AssetCatalog::new(),
            modified: false,
            revision: 0,
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn io(&self) -> &I {
        &self.io
    }

    fn touch(&mut self) {
        self.modified = true;
        self.revision += 1;
    }

    /// Start a new, empty package.
    pub fn create_new(&mut self) {
        self.install_catalog(AssetCatalog::new());
        info!("Created new package");
    }

    /// Replace the open package with the one at `path`.
    ///
    /// On failure the current catalog is left exactly as it was.
    pub fn load(&mut self, path: &Path) -> ManagerResult<()> {
        let catalog = self.io.load(path)?;
        self.install_catalog(catalog);
        Ok(())
    }

    /// Write the open package to `path` and clear the modified flag.
    pub fn save(&mut self, path: &Path) -> ManagerResult<()> {
        self.io.save(&self.catalog, path)?;
        self.modified = false;
        Ok(())
    }

    /// Swap in a catalog loaded elsewhere, e.g. on a background task.
    pub fn install_catalog(&mut self, catalog: AssetCatalog) {
        self.catalog = catalog;
        self.modified = false;
        self.revision += 1;
    }

    /// Copy of the catalog plus the revision it was taken at.
    ///
    /// Pass the revision to [`complete_save`](Self::complete_save) once the
    /// copy has been written.
    pub fn snapshot(&self) -> (AssetCatalog, u64) {
        (self.catalog.clone(), self.revision)
    }

    /// Record that the snapshot taken at `revision` was saved.
    ///
    /// The modified flag is only cleared if nothing changed since the
    /// snapshot. Returns whether it was cleared.
    pub fn complete_save(&mut self, revision: u64) -> bool {
        if revision == self.revision {
            self.modified = false;
            true
        } else {
            debug!(
                saved = revision,
                current = self.revision,
                "Catalog changed during save, keeping modified flag"
            );
            false
        }
    }

    /// Whether there are changes since the last load, save or reset.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Counter bumped by every change to the catalog.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    /// All assets, sorted by path.
    pub fn get_assets(&self) -> Vec<&UnityAsset> {
        self.catalog.sorted()
    }

    /// Assets whose path contains `query`, ignoring case.
    ///
    /// A blank query returns everything.
    pub fn get_filtered_assets(&self, query: &str) -> Vec<&UnityAsset> {
        let query = query.trim();
        if query.is_empty() {
            return self.get_assets();
        }
        let needle = query.to_lowercase();
        self.catalog
            .sorted()
            .into_iter()
            .filter(|asset| asset.asset_path().to_lowercase().contains(&needle))
            .collect()
    }

    /// Assets whose path starts with `prefix`.
    pub fn get_assets_under_path(&self, prefix: &str) -> Vec<&UnityAsset> {
        self.catalog
            .sorted()
            .into_iter()
            .filter(|asset| asset.asset_path().starts_with(prefix))
            .collect()
    }

    pub fn asset_by_path(&self, path: &str) -> Option<&UnityAsset> {
        self.catalog.get_by_path(path)
    }

    /// Folder hierarchy of the current catalog.
    pub fn tree(&self) -> PackageTree {
        tree::build(self.catalog.all())
    }

    /// Add the file at `source` as a new asset at `asset_path`.
    ///
    /// The asset gets a fresh GUID and a default `.meta` naming it. Files
    /// larger than the configured limit are rejected before being buffered.
    pub fn add_asset(&mut self, source: &Path, asset_path: &str) -> ManagerResult<Guid> {
        let limit = self.config.max_asset_size;
        let read_failed = |source_err| ManagerError::ReadFailed {
            path: source.to_path_buf(),
            source: source_err,
        };
        let too_large = |size| ManagerError::AssetTooLarge {
            path: source.to_path_buf(),
            size,
            limit,
        };

        let size = fs::metadata(source).map_err(read_failed)?.len();
        if size > limit {
            return Err(too_large(size));
        }

        let mut content = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
        File::open(source)
            .and_then(|file| file.take(limit.saturating_add(1)).read_to_end(&mut content))
            .map_err(read_failed)?;
        let read = content.len() as u64;
        if read > limit {
            return Err(too_large(read));
        }

        let asset = UnityAsset::create_new(asset_path)?;
        let meta = default_meta(asset.guid());
        let asset = asset.with_content(content).with_meta(meta);
        let guid = asset.guid().clone();

        self.catalog.add_or_replace(asset);
        self.touch();
        info!(path = asset_path, guid = %guid, bytes = read, "Added asset");
        Ok(guid)
    }

    /// Replace the content of the asset at `asset_path`.
    ///
    /// Returns `false`, with a warning, if no asset has that path.
    pub fn update_asset_content(&mut self, asset_path: &str, content: impl Into<Bytes>) -> bool {
        let Some(asset) = self.catalog.get_by_path(asset_path).cloned() else {
            warn!(path = asset_path, "Cannot update content: asset not found");
            return false;
        };
        self.catalog.add_or_replace(asset.with_content(content));
        self.touch();
        debug!(path = asset_path, "Updated asset content");
        true
    }

    /// Replace the `.meta` of the asset at `asset_path`.
    ///
    /// Returns `false`, with a warning, if no asset has that path.
    pub fn update_asset_meta(&mut self, asset_path: &str, meta: impl Into<Bytes>) -> bool {
        let Some(asset) = self.catalog.get_by_path(asset_path).cloned() else {
            warn!(path = asset_path, "Cannot update meta: asset not found");
            return false;
        };
        self.catalog.add_or_replace(asset.with_meta(meta));
        self.touch();
        debug!(path = asset_path, "Updated asset meta");
        true
    }

    /// Remove the asset at `asset_path`.
    ///
    /// The package counts as modified even if nothing was there. Returns
    /// whether an asset was removed.
    pub fn remove_asset(&mut self, asset_path: &str) -> bool {
        let removed = self.catalog.remove_by_path(asset_path);
        self.touch();
        match &removed {
            Some(asset) => info!(path = asset_path, guid = %asset.guid(), "Removed asset"),
            None => warn!(path = asset_path, "Asset to remove was not found"),
        }
        removed.is_some()
    }

    /// Remove every asset whose path starts with `prefix` plus `/`.
    ///
    /// A directory placeholder stored at exactly `prefix` (no trailing
    /// slash) is removed as well, so no orphan folder is left behind.
    /// `"Assets/MyDir"` removes `Assets/MyDir/a.txt` but not
    /// `Assets/MyDirectory/b.txt`. Returns the number of assets removed.
    pub fn remove_directory(&mut self, prefix: &str) -> usize {
        let folder = prefix.trim_end_matches('/');
        let inside = format!("{folder}/");

        let doomed: Vec<Guid> = self
            .catalog
            .all()
            .filter(|asset| {
                let path = asset.asset_path();
                path.starts_with(&inside) || (path == folder && asset.is_directory())
            })
            .map(|asset| asset.guid().clone())
            .collect();

        for guid in &doomed {
            self.catalog.remove_by_guid(guid);
        }
        if !doomed.is_empty() {
            self.touch();
        }
        info!(prefix = folder, count = doomed.len(), "Removed directory");
        doomed.len()
    }

    /// Write the content of `assets` below `output_dir`.
    ///
    /// See [`extract_assets`](super::extract_assets).
    pub fn extract_assets<'a>(
        &self,
        assets: impl IntoIterator<Item = &'a UnityAsset>,
        output_dir: &Path,
        prefix_to_strip: &str,
    ) -> ManagerResult<usize> {
        extract_assets(assets, output_dir, prefix_to_strip)
    }
}
