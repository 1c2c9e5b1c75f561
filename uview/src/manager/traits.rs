//! Storage seam for the Package Manager.
//!
//! The manager never touches the archive format directly; it goes through
//! [`PackageIo`], so tests can substitute an in-memory implementation.

use std::path::Path;

use tracing::info;

use crate::catalog::AssetCatalog;
use crate::codec::{read_package, write_package, CodecResult};

/// Loads and saves whole catalogs.
pub trait PackageIo: Send + Sync {
    /// Read the package at `path` into a fresh catalog.
    fn load(&self, path: &Path) -> CodecResult<AssetCatalog>;

    /// Write `catalog` to `path`, replacing it only on success.
    fn save(&self, catalog: &AssetCatalog, path: &Path) -> CodecResult<()>;
}

/// [`PackageIo`] backed by `.unitypackage` files on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnityPackageIo;

impl PackageIo for UnityPackageIo {
    fn load(&self, path: &Path) -> CodecResult<AssetCatalog> {
        let catalog = AssetCatalog::from_assets(read_package(path)?.into_assets());
        info!(path = %path.display(), assets = catalog.len(), "Loaded package");
        Ok(catalog)
    }

    fn save(&self, catalog: &AssetCatalog, path: &Path) -> CodecResult<()> {
        write_package(catalog.all(), path)?;
        info!(path = %path.display(), assets = catalog.len(), "Saved package");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::asset::UnityAsset;

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("pkg.unitypackage");
        let io = UnityPackageIo;

        let mut catalog = AssetCatalog::new();
        catalog.add_or_replace(
            UnityAsset::create_new("Assets/a.txt")
                .unwrap()
                .with_content(b"a".to_vec()),
        );
        io.save(&catalog, &path).unwrap();

        let loaded = io.load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(
            loaded.get_by_path("Assets/a.txt").unwrap().content(),
            Some(&b"a"[..])
        );
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = UnityPackageIo
            .load(&temp.path().join("missing.unitypackage"))
            .unwrap_err();
        assert!(!err.is_format_error());
    }
}
