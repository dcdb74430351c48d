//! # Archive Packer / Unpacker
//!
//! The stuffed payload is a plain ZIP archive whose entry names are virtual
//! paths (`/static/app.css`), not the paths the files were read from. The
//! stored name is authoritative: that is what makes aliasing work.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Cursor, Read, Write};

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::common::{FileMetadata, DEFAULT_MODE};
use crate::error::{Result, StuffError};
use crate::resolve::{Resolver, WalkEntry};
use crate::vfs::{FileEntry, FileSystem, MemFs};

/// Resolves `specs` under `root` and zips every file they name.
pub fn zip_files<I, S>(root: &str, specs: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pack(Resolver::new(root, specs))
}

/// Builds a deflate-compressed archive from resolved entries.
///
/// Two entries mounted on the same virtual path are rejected: the archive
/// could never be unpacked into a filesystem.
pub fn pack<I>(entries: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = Result<WalkEntry>>,
{
    let mut zw = ZipWriter::new(Cursor::new(Vec::new()));
    let mut seen = HashSet::new();

    for entry in entries {
        let entry = entry?;
        if !seen.insert(entry.target.clone()) {
            return Err(StuffError::AlreadyExists(entry.target));
        }
        zip_file(&mut zw, &entry)?;
    }

    let buf = zw.finish()?.into_inner();
    tracing::debug!(files = seen.len(), bytes = buf.len(), "packed archive");
    Ok(buf)
}

fn zip_file(zw: &mut ZipWriter<Cursor<Vec<u8>>>, entry: &WalkEntry) -> Result<()> {
    let mut src = File::open(&entry.source).map_err(|e| StuffError::io(&entry.source, e))?;

    let mut options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(entry.metadata.mode);
    if let Some(t) = entry.metadata.modified.and_then(to_zip_time) {
        options = options.last_modified_time(t);
    }

    zw.start_file(entry.target.as_str(), options)?;
    io::copy(&mut src, zw).map_err(|e| StuffError::io(&entry.source, e))?;
    Ok(())
}

/// Decodes an archive into the entries it holds, in archive order.
pub fn entries(b: &[u8]) -> Result<Vec<FileEntry>> {
    let mut archive = ZipArchive::new(Cursor::new(b))?;
    let mut out = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut f = archive.by_index(i)?;
        if f.is_dir() {
            continue;
        }
        // The header size is untrusted: never presize past the blob itself.
        let mut content = Vec::with_capacity(f.size().min(b.len() as u64) as usize);
        f.read_to_end(&mut content)
            .map_err(|e| StuffError::Archive(e.into()))?;

        let meta = FileMetadata::new(
            content.len() as u64,
            f.unix_mode().map(|m| m & 0o7777).unwrap_or(DEFAULT_MODE),
            from_zip_time(f.last_modified()),
        );
        out.push(FileEntry::new(f.name(), meta, content));
    }

    Ok(out)
}

/// Unzips an archive into a fresh in-memory filesystem.
pub fn unzip(b: &[u8]) -> Result<MemFs> {
    let mut fs = MemFs::new();
    for entry in entries(b)? {
        fs.add(entry)?;
    }
    Ok(fs)
}

/// Writes raw archive bytes somewhere, e.g. for the `unstuff` action.
pub fn write_raw<W: Write>(w: &mut W, b: &[u8]) -> io::Result<()> {
    w.write_all(b)?;
    w.flush()
}

// ZIP timestamps are MS-DOS times: 2-second resolution, years 1980..=2107.
fn to_zip_time(t: NaiveDateTime) -> Option<zip::DateTime> {
    let year = u16::try_from(t.year()).ok()?;
    zip::DateTime::from_date_and_time(
        year,
        t.month() as u8,
        t.day() as u8,
        t.hour() as u8,
        t.minute() as u8,
        t.second() as u8,
    )
    .ok()
}

fn from_zip_time(t: zip::DateTime) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(t.year() as i32, t.month() as u32, t.day() as u32)?.and_hms_opt(
        t.hour() as u32,
        t.minute() as u32,
        t.second() as u32,
    )
}
