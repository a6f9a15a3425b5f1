//! Snapshot: whole-file reads and atomic whole-file writes.

use crate::error::{IndexError, Result};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Read the file at `path` as UTF-8, or return `None` if it does not exist.
///
/// Invalid UTF-8 is reported as a corrupt file, not an I/O failure.
pub fn read_if_exists(path: &Path) -> Result<Option<String>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(IndexError::io("reading", path, e)),
    };
    String::from_utf8(bytes)
        .map(Some)
        .map_err(|e| IndexError::corrupt(path, 0, format!("file is not valid UTF-8: {}", e)))
}

/// Sibling temp path used while writing `path`.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("index"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `contents` to `path`, replacing any existing file.
///
/// The data goes to a sibling temp file which is fsynced and then renamed
/// over the target, so readers see either the old file or the complete new
/// one. On Unix the parent directory is fsynced afterwards so the rename
/// itself survives a crash. If writing or renaming fails, the temp file is
/// removed and the target is left as it was.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| IndexError::io("creating directory", parent, e))?;

    let tmp = temp_path(path);
    let written = write_and_sync(&tmp, contents)
        .and_then(|()| fs::rename(&tmp, path).map_err(|e| IndexError::io("replacing", path, e)));

    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written?;

    // The new contents are already in place; a failed directory sync only
    // weakens crash durability.
    if let Err(e) = sync_dir(parent) {
        tracing::warn!(path = %path.display(), error = %e, "directory sync failed after replace");
    }
    Ok(())
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    File::open(dir)
        .and_then(|d| d.sync_all())
        .map_err(|e| IndexError::io("syncing directory", dir, e))
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}

fn write_and_sync(tmp: &Path, contents: &[u8]) -> Result<()> {
    let mut file = File::create(tmp).map_err(|e| IndexError::io("creating", tmp, e))?;
    file.write_all(contents)
        .map_err(|e| IndexError::io("writing", tmp, e))?;
    file.sync_all().map_err(|e| IndexError::io("syncing", tmp, e))?;
    Ok(())
}
