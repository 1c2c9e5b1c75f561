//! Running slow package operations off the caller's thread.
//!
//! Loading, saving and extracting are bound by I/O and compression. These
//! helpers run them on tokio's blocking pool and hand the result back; the
//! caller applies it to its [`PackageManager`](super::PackageManager):
//!
//! ```text
//! owner                         blocking pool
//! ─────                         ─────────────
//! snapshot() ──catalog copy──▶  save_in_background
//!                               load_in_background
//! complete_save(rev) ◀─result─┘
//! install_catalog(c) ◀─result─┘
//! ```
//!
//! Nothing here touches the manager itself, so edits made while a save is
//! in flight are never lost; `complete_save` only clears the modified flag
//! if the revision still matches.

use std::path::PathBuf;

use tokio::task::{self, JoinError};
use tracing::debug;

use super::error::{ManagerError, ManagerResult};
use super::extract::extract_assets;
use super::traits::PackageIo;
use crate::asset::UnityAsset;
use crate::catalog::AssetCatalog;

fn join_failed(e: JoinError) -> ManagerError {
    ManagerError::Background(e.to_string())
}

/// Load the package at `path` on the blocking pool.
pub async fn load_in_background<I>(io: I, path: PathBuf) -> ManagerResult<AssetCatalog>
where
    I: PackageIo + 'static,
{
    debug!(path = %path.display(), "Loading package in background");
    let catalog = task::spawn_blocking(move || io.load(&path))
        .await
        .map_err(join_failed)??;
    Ok(catalog)
}

/// Save `catalog` to `path` on the blocking pool.
pub async fn save_in_background<I>(io: I, catalog: AssetCatalog, path: PathBuf) -> ManagerResult<()>
where
    I: PackageIo + 'static,
{
    debug!(path = %path.display(), assets = catalog.len(), "Saving package in background");
    task::spawn_blocking(move || io.save(&catalog, &path))
        .await
        .map_err(join_failed)??;
    Ok(())
}

/// Extract `assets` below `output_dir` on the blocking pool.
pub async fn extract_in_background(
    assets: Vec<UnityAsset>,
    output_dir: PathBuf,
    prefix_to_strip: String,
) -> ManagerResult<usize> {
    task::spawn_blocking(move || extract_assets(&assets, &output_dir, &prefix_to_strip))
        .await
        .map_err(join_failed)?
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::manager::{ManagerConfig, PackageManager, UnityPackageIo};

    fn asset(path: &str, content: &[u8]) -> UnityAsset {
        UnityAsset::create_new(path)
            .unwrap()
            .with_content(content.to_vec())
    }

    #[tokio::test]
    async fn test_save_and_load_in_background() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bg.unitypackage");
        let mut manager = PackageManager::with_config(ManagerConfig::default());
        manager.install_catalog(AssetCatalog::from_assets([asset("Assets/a.txt", b"a")]));
        manager.update_asset_content("Assets/a.txt", b"edited".to_vec());
        assert!(manager.is_modified());

        let (snapshot, revision) = manager.snapshot();
        save_in_background(UnityPackageIo, snapshot, path.clone())
            .await
            .unwrap();
        assert!(manager.complete_save(revision));
        assert!(!manager.is_modified());

        let catalog = load_in_background(UnityPackageIo, path).await.unwrap();
        let mut reopened = PackageManager::default();
        reopened.install_catalog(catalog);
        assert_eq!(
            reopened.asset_by_path("Assets/a.txt").unwrap().content(),
            Some(&b"edited"[..])
        );
    }

    #[tokio::test]
    async fn test_load_in_background_reports_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("garbage.unitypackage");
        std::fs::write(&path, b"definitely not gzip").unwrap();

        let err = load_in_background(UnityPackageIo, path).await.unwrap_err();
        assert!(err.is_format_error());
    }

    #[tokio::test]
    async fn test_extract_in_background() {
        let temp = TempDir::new().unwrap();
        let assets = vec![asset("Assets/x/one.txt", b"1"), asset("Assets/x/two.txt", b"2")];

        let count = extract_in_background(assets, temp.path().to_path_buf(), "Assets/x/".into())
            .await
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(std::fs::read(temp.path().join("two.txt")).unwrap(), b"2");
    }
}
