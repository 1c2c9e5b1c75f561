//! Decoding package archives.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use bytes::Bytes;
use flate2::read::GzDecoder;
use tar::Archive;
use tracing::{debug, warn};

use super::member::Member;
use super::pathname::{clean_entry_name, clean_pathname_bytes};
use super::{CodecError, CodecResult};
use crate::asset::{Guid, UnityAsset};

/// Member payloads collected for one GUID directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBundle {
    pub pathname: Option<Vec<u8>>,
    pub asset: Option<Vec<u8>>,
    pub meta: Option<Vec<u8>>,
    pub preview: Option<Vec<u8>>,
}

impl RawBundle {
    /// Bytes stored for `member`, if the archive contained it.
    pub fn get(&self, member: Member) -> Option<&[u8]> {
        match member {
            Member::Pathname => self.pathname.as_deref(),
            Member::Asset => self.asset.as_deref(),
            Member::Meta => self.meta.as_deref(),
            Member::Preview => self.preview.as_deref(),
        }
    }

    /// Store `data` for `member`, replacing an earlier entry of the same name.
    pub fn insert(&mut self, member: Member, data: Vec<u8>) {
        let slot = match member {
            Member::Pathname => &mut self.pathname,
            Member::Asset => &mut self.asset,
            Member::Meta => &mut self.meta,
            Member::Preview => &mut self.preview,
        };
        *slot = Some(data);
    }
}

/// Flat GUID → member map, exactly as found in an archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPackage {
    bundles: BTreeMap<String, RawBundle>,
}

impl RawPackage {
    /// Create an empty raw package.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the bytes of one archive member.
    pub fn insert(&mut self, guid: impl Into<String>, member: Member, data: Vec<u8>) {
        self.bundles
            .entry(guid.into())
            .or_default()
            .insert(member, data);
    }

    /// Bundle for a GUID directory.
    pub fn get(&self, guid: &str) -> Option<&RawBundle> {
        self.bundles.get(guid)
    }

    /// Number of GUID directories seen.
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    /// Whether the archive had no asset members at all.
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Iterate bundles in GUID order.
    pub fn bundles(&self) -> impl Iterator<Item = (&str, &RawBundle)> {
        self.bundles.iter().map(|(guid, bundle)| (guid.as_str(), bundle))
    }

    /// Turn the raw bundles into assets.
    ///
    /// A bundle without a `pathname` member cannot be addressed and is
    /// dropped, as is one whose path is empty after cleaning.
    pub fn into_assets(self) -> Vec<UnityAsset> {
        let mut assets = Vec::with_capacity(self.bundles.len());

        for (guid, bundle) in self.bundles {
            let Some(raw_path) = bundle.pathname.as_deref() else {
                debug!(guid = %guid, "Dropping bundle without pathname");
                continue;
            };
            let asset_path = clean_pathname_bytes(raw_path);

            let asset = Guid::new(guid.as_str())
                .and_then(|id| UnityAsset::new(id, asset_path));
            match asset {
                Ok(asset) => assets.push(asset.with_optional_payloads(
                    bundle.asset.map(Bytes::from),
                    bundle.meta.map(Bytes::from),
                    bundle.preview.map(Bytes::from),
                )),
                Err(e) => warn!(guid = %guid, error = %e, "Dropping unaddressable bundle"),
            }
        }

        assets
    }
}

/// Decode a gzip-compressed tar stream into a [`RawPackage`].
///
/// Tar directory entries are skipped, as are entries whose cleaned name has
/// no `/` or whose file name is not a known [`Member`]. Any gzip or tar
/// failure aborts the whole decode.
pub fn decode<R: Read>(reader: R) -> CodecResult<RawPackage> {
    let mut archive = Archive::new(GzDecoder::new(reader));
    let mut raw = RawPackage::new();

    let entries = archive.entries().map_err(CodecError::Malformed)?;
    for entry in entries {
        let mut entry = entry.map_err(CodecError::Malformed)?;

        let name = clean_entry_name(&entry.path_bytes());
        if entry.header().entry_type().is_dir() || name.ends_with('/') {
            continue;
        }
        let name = name.trim_start_matches("./");

        let Some((guid, file_name)) = name.rsplit_once('/') else {
            debug!(entry = %name, "Skipping entry outside a GUID directory");
            continue;
        };
        let Some(member) = Member::from_file_name(file_name) else {
            debug!(entry = %name, "Skipping unknown package member");
            continue;
        };

        let mut data = Vec::new();
        entry
            .read_to_end(&mut data)
            .map_err(CodecError::Malformed)?;
        raw.insert(guid, member, data);
    }

    Ok(raw)
}

/// Open and decode a package file.
pub fn read_package(path: &Path) -> CodecResult<RawPackage> {
    let file = File::open(path).map_err(|e| CodecError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let raw = decode(BufReader::new(file))?;
    debug!(path = %path.display(), bundles = raw.len(), "Decoded package archive");
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tar::{Builder, EntryType, Header};

    use super::*;

    const GUID: &str = "e8c5a5e3a3e2c4b4f8d9a8c7b6a5e4d3";

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn tar_with(build: impl FnOnce(&mut Builder<Vec<u8>>)) -> Vec<u8> {
        let mut builder = Builder::new(Vec::new());
        build(&mut builder);
        gzip(&builder.into_inner().unwrap())
    }

    fn append_file(builder: &mut Builder<Vec<u8>>, name: &str, data: &[u8]) {
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Regular);
        header.set_mode(0o644);
        header.set_size(data.len() as u64);
        builder.append_data(&mut header, name, data).unwrap();
    }

    fn append_dir(builder: &mut Builder<Vec<u8>>, name: &str) {
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Directory);
        header.set_mode(0o755);
        header.set_size(0);
        builder
            .append_data(&mut header, name, std::io::empty())
            .unwrap();
    }

    #[test]
    fn test_decode_reads_all_members() {
        let archive = tar_with(|b| {
            append_dir(b, &format!("{GUID}/"));
            append_file(b, &format!("{GUID}/pathname"), b"Assets/Scripts/Player.cs");
            append_file(b, &format!("{GUID}/asset"), b"public class Player {}");
            append_file(b, &format!("{GUID}/asset.meta"), b"fileFormatVersion: 2");
            append_file(b, &format!("{GUID}/preview.png"), &[0x89, b'P', b'N', b'G']);
        });

        let raw = decode(archive.as_slice()).unwrap();

        assert_eq!(raw.len(), 1);
        let bundle = raw.get(GUID).unwrap();
        assert_eq!(bundle.get(Member::Pathname), Some(&b"Assets/Scripts/Player.cs"[..]));
        assert_eq!(bundle.get(Member::Asset), Some(&b"public class Player {}"[..]));
        assert_eq!(bundle.get(Member::Meta), Some(&b"fileFormatVersion: 2"[..]));
        assert_eq!(bundle.get(Member::Preview), Some(&[0x89, b'P', b'N', b'G'][..]));
    }

    #[test]
    fn test_into_assets_builds_asset() {
        let archive = tar_with(|b| {
            append_file(b, &format!("{GUID}/pathname"), b"Assets/Scripts/Player.cs\n");
            append_file(b, &format!("{GUID}/asset"), b"code");
        });

        let assets = decode(archive.as_slice()).unwrap().into_assets();

        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].guid().as_str(), GUID);
        assert_eq!(assets[0].asset_path(), "Assets/Scripts/Player.cs");
        assert_eq!(assets[0].content(), Some(&b"code"[..]));
        assert_eq!(assets[0].meta(), None);
    }

    #[test]
    fn test_bundle_without_content_is_directory() {
        let archive = tar_with(|b| {
            append_file(b, "dirguid/pathname", b"Assets/Textures");
            append_file(b, "dirguid/asset.meta", b"folderAsset: yes");
        });

        let assets = decode(archive.as_slice()).unwrap().into_assets();

        assert_eq!(assets.len(), 1);
        assert!(assets[0].is_directory());
        assert_eq!(assets[0].meta(), Some(&b"folderAsset: yes"[..]));
    }

    #[test]
    fn test_bundle_without_pathname_is_dropped() {
        let archive = tar_with(|b| {
            append_file(b, "orphan/asset", b"data");
            append_file(b, "kept/pathname", b"Assets/kept.txt");
            append_file(b, "kept/asset", b"data");
        });

        let raw = decode(archive.as_slice()).unwrap();
        assert_eq!(raw.len(), 2);

        let assets = raw.into_assets();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].asset_path(), "Assets/kept.txt");
    }

    #[test]
    fn test_entries_without_slash_and_unknown_members_are_ignored() {
        let archive = tar_with(|b| {
            append_file(b, "stray-file", b"junk");
            append_file(b, "g/pathname", b"Assets/a.txt");
            append_file(b, "g/asset.info", b"ignored");
        });

        let raw = decode(archive.as_slice()).unwrap();

        assert_eq!(raw.len(), 1);
        assert_eq!(raw.get("g").unwrap().asset, None);
    }

    #[test]
    fn test_backslash_entry_names_are_normalised() {
        let archive = tar_with(|b| {
            append_file(b, "g\\pathname", b"Assets/a.txt");
            append_file(b, "g\\asset", b"data");
        });

        let assets = decode(archive.as_slice()).unwrap().into_assets();

        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].guid().as_str(), "g");
        assert_eq!(assets[0].content(), Some(&b"data"[..]));
    }

    #[test]
    fn test_nul_padded_long_names_are_truncated() {
        let archive = tar_with(|b| {
            let long_name = format!("{GUID}/pathname\0\0\0");
            let mut link = Header::new_gnu();
            link.set_entry_type(EntryType::GNULongName);
            link.set_size(long_name.len() as u64);
            link.as_gnu_mut().unwrap().name[..13].copy_from_slice(b"././@LongLink");
            link.set_cksum();
            b.append(&link, long_name.as_bytes()).unwrap();

            let data = b"Assets/legacy.txt00";
            let mut header = Header::new_gnu();
            header.set_entry_type(EntryType::Regular);
            header.set_size(data.len() as u64);
            header.set_path("placeholder").unwrap();
            header.set_cksum();
            b.append(&header, &data[..]).unwrap();

            append_file(b, &format!("{GUID}/asset"), b"x");
        });

        let assets = decode(archive.as_slice()).unwrap().into_assets();

        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].guid().as_str(), GUID);
        assert_eq!(assets[0].asset_path(), "Assets/legacy.txt");
    }

    #[test]
    fn test_empty_gzip_stream_is_empty_package() {
        let raw = decode(gzip(&[]).as_slice()).unwrap();
        assert!(raw.is_empty());
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = decode(&b"definitely not gzip"[..]).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_gzip_of_garbage_is_malformed() {
        let junk = b"not a tar header ".repeat(64);
        let err = decode(gzip(&junk).as_slice()).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_read_package_missing_file_is_io_error() {
        let err = read_package(Path::new("/nonexistent/uview/missing.unitypackage")).unwrap_err();
        assert!(matches!(err, CodecError::Io { .. }));
        assert!(!err.is_format_error());
    }
}
