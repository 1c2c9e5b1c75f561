//! Encoding package archives.

use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use flate2::write::GzEncoder;
use flate2::Compression;
use tar::{Builder, EntryType, Header};
use tracing::debug;

use super::member::Member;
use super::{CodecError, CodecResult};
use crate::asset::UnityAsset;

const DIR_MODE: u32 = 0o755;
const FILE_MODE: u32 = 0o644;

/// Write assets as a gzip-compressed tar stream and return the inner writer.
///
/// Assets are written in GUID order so the same catalog always produces the
/// same member layout. Per asset the stream holds a `<guid>/` directory
/// entry, the `pathname` member, then `asset`, `asset.meta` and
/// `preview.png` for whichever payloads are present. Names that do not fit
/// a tar header are carried in GNU long-name records rather than truncated.
pub fn encode<'a, W, I>(assets: I, writer: W) -> CodecResult<W>
where
    W: Write,
    I: IntoIterator<Item = &'a UnityAsset>,
{
    let mut assets: Vec<&UnityAsset> = assets.into_iter().collect();
    assets.sort_by(|a, b| a.guid().cmp(b.guid()));

    let mtime = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let mut builder = Builder::new(GzEncoder::new(writer, Compression::default()));
    for asset in &assets {
        append_asset(&mut builder, asset, mtime).map_err(CodecError::Write)?;
    }

    let encoder = builder.into_inner().map_err(CodecError::Write)?;
    encoder.finish().map_err(CodecError::Write)
}

/// Write assets to `dest`, replacing it atomically.
///
/// The archive is written to a temporary file in the destination directory
/// and renamed over `dest` only once it is complete and synced. On any
/// failure the temporary file is removed and `dest` is left untouched.
pub fn write_package<'a, I>(assets: I, dest: &Path) -> CodecResult<()>
where
    I: IntoIterator<Item = &'a UnityAsset>,
{
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let io_error = |path: &Path, source: io::Error| CodecError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".uview-")
        .suffix(".unitypackage.tmp")
        .tempfile_in(dir)
        .map_err(|e| io_error(dir, e))?;

    let mut writer = encode(assets, BufWriter::new(temp.as_file_mut()))?;
    writer.flush().map_err(CodecError::Write)?;
    drop(writer);

    temp.as_file()
        .sync_all()
        .map_err(|e| io_error(temp.path(), e))?;
    temp.persist(dest).map_err(|e| io_error(dest, e.error))?;

    debug!(path = %dest.display(), "Wrote package archive");
    Ok(())
}

fn append_asset<W: Write>(
    builder: &mut Builder<W>,
    asset: &UnityAsset,
    mtime: u64,
) -> io::Result<()> {
    let dir = format!("{}/", asset.guid());

    let mut header = Header::new_gnu();
    header.set_entry_type(EntryType::Directory);
    header.set_mode(DIR_MODE);
    header.set_size(0);
    header.set_mtime(mtime);
    builder.append_data(&mut header, &dir, io::empty())?;

    append_member(
        builder,
        &dir,
        Member::Pathname,
        asset.asset_path().as_bytes(),
        mtime,
    )?;
    if let Some(content) = asset.content() {
        append_member(builder, &dir, Member::Asset, content, mtime)?;
    }
    if let Some(meta) = asset.meta() {
        append_member(builder, &dir, Member::Meta, meta, mtime)?;
    }
    if let Some(preview) = asset.preview() {
        append_member(builder, &dir, Member::Preview, preview, mtime)?;
    }
    Ok(())
}

fn append_member<W: Write>(
    builder: &mut Builder<W>,
    dir: &str,
    member: Member,
    data: &[u8],
    mtime: u64,
) -> io::Result<()> {
    let mut header = Header::new_gnu();
    header.set_entry_type(EntryType::Regular);
    header.set_mode(FILE_MODE);
    header.set_size(data.len() as u64);
    header.set_mtime(mtime);
    builder.append_data(&mut header, format!("{dir}{member}"), data)
}
