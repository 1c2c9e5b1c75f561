//! Writing asset content out to the host filesystem.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use super::error::{ManagerError, ManagerResult};
use crate::asset::UnityAsset;

/// Map an asset path to a path relative to the output directory.
///
/// Returns `Ok(None)` when nothing is left to write to, and `UnsafePath` when
/// the path would resolve outside the output directory.
fn relative_target(asset_path: &str, relative: &str) -> ManagerResult<Option<PathBuf>> {
    if relative.starts_with(['/', '\\']) {
        return Err(ManagerError::UnsafePath(asset_path.to_string()));
    }

    let mut target = PathBuf::new();
    for segment in relative.split(['/', '\\']) {
        match segment {
            "" | "." => continue,
            ".." => return Err(ManagerError::UnsafePath(asset_path.to_string())),
            segment => {
                let mut components = Path::new(segment).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(_)), None) => target.push(segment),
                    _ => return Err(ManagerError::UnsafePath(asset_path.to_string())),
                }
            }
        }
    }

    Ok((!target.as_os_str().is_empty()).then_some(target))
}

/// Write the content of `assets` below `output_dir`.
///
/// `prefix_to_strip` is removed from the front of each asset path that starts
/// with it, so extracting `Assets/folder/` yields files relative to that
/// folder. Directory placeholders and assets whose path is empty after
/// stripping are skipped. Returns the number of files written.
pub fn extract_assets<'a>(
    assets: impl IntoIterator<Item = &'a UnityAsset>,
    output_dir: &Path,
    prefix_to_strip: &str,
) -> ManagerResult<usize> {
    fs::create_dir_all(output_dir).map_err(|source| ManagerError::CreateDirFailed {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut written = 0;
    for asset in assets {
        let Some(content) = asset.content() else {
            continue;
        };
        let path = asset.asset_path();
        let relative = path.strip_prefix(prefix_to_strip).unwrap_or(path);
        let Some(relative) = relative_target(path, relative)? else {
            debug!(path, "Skipping asset with empty relative path");
            continue;
        };

        let target = output_dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| ManagerError::CreateDirFailed {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&target, content).map_err(|source| ManagerError::WriteFailed {
            path: target.clone(),
            source,
        })?;
        debug!(path, target = %target.display(), bytes = content.len(), "Extracted asset");
        written += 1;
    }

    info!(output_dir = %output_dir.display(), count = written, "Extraction complete");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn file(path: &str, content: &[u8]) -> UnityAsset {
        UnityAsset::create_new(path)
            .unwrap()
            .with_content(content.to_vec())
    }

    #[test]
    fn test_prefix_is_stripped() {
        let temp = TempDir::new().unwrap();
        let asset = file("Assets/folder/MyFile.txt", b"Hello");

        let count = extract_assets([&asset], temp.path(), "Assets/folder/").unwrap();

        assert_eq!(count, 1);
        assert_eq!(fs::read(temp.path().join("MyFile.txt")).unwrap(), b"Hello");
    }

    #[test]
    fn test_paths_without_prefix_are_kept_whole() {
        let temp = TempDir::new().unwrap();
        let asset = file("Other/b.txt", b"b");

        extract_assets([&asset], temp.path(), "Assets/").unwrap();

        assert_eq!(fs::read(temp.path().join("Other/b.txt")).unwrap(), b"b");
    }

    #[test]
    fn test_nested_directories_are_created() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        let asset = file("Assets/a/b/c.txt", b"c");

        extract_assets([&asset], &out, "").unwrap();

        assert_eq!(fs::read(out.join("Assets/a/b/c.txt")).unwrap(), b"c");
    }

    #[test]
    fn test_directories_and_empty_paths_are_skipped() {
        let temp = TempDir::new().unwrap();
        let folder = UnityAsset::create_new("Assets/folder/").unwrap();
        let exact = file("Assets/folder/", b"not a file");

        let count = extract_assets([&folder, &exact], temp.path(), "Assets/folder/").unwrap();

        assert_eq!(count, 0);
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_parent_traversal_is_refused() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        let evil = file("Assets/../../escape.txt", b"x");

        let err = extract_assets([&evil], &out, "").unwrap_err();

        assert!(matches!(err, ManagerError::UnsafePath(_)));
        assert!(!temp.path().join("escape.txt").exists());
    }

    #[test]
    fn test_absolute_path_is_refused() {
        let temp = TempDir::new().unwrap();
        let evil = file("/etc/passwd", b"x");

        let err = extract_assets([&evil], temp.path(), "").unwrap_err();
        assert!(matches!(err, ManagerError::UnsafePath(_)));
    }
}
