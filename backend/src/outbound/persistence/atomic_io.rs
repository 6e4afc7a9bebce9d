//! Atomic replacement of the record store file.
//!
//! The document is written to a hidden temporary file in the same directory,
//! synced, then renamed over the target so readers only ever observe the old
//! or the new document.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use cap_std::fs::{Dir, OpenOptions};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Replace `file_name` inside `dir` with `contents`.
///
/// On failure the previous file, if any, is left untouched and the temporary
/// file is removed on a best-effort basis.
///
/// # Errors
///
/// Returns the underlying I/O error from creating, writing, syncing or
/// renaming the temporary file.
pub(crate) fn write_atomic(dir: &Dir, file_name: &str, contents: &[u8]) -> io::Result<()> {
    let tmp_name = temp_name_for(file_name);
    write_temp_file(dir, &tmp_name, contents)?;
    if let Err(err) = replace_target(dir, &tmp_name, file_name) {
        drop(dir.remove_file(&tmp_name));
        return Err(err);
    }
    sync_directory(dir);
    Ok(())
}

fn temp_name_for(file_name: &str) -> String {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    format!(
        ".{file_name}.tmp.{}.{nanos}.{counter}",
        std::process::id()
    )
}

fn write_temp_file(dir: &Dir, tmp_name: &str, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;

    let written = file.write_all(contents).and_then(|()| file.sync_all());
    if let Err(err) = written {
        drop(file);
        drop(dir.remove_file(tmp_name));
        return Err(err);
    }
    Ok(())
}

#[cfg(windows)]
fn replace_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Rename does not overwrite on Windows.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn replace_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

fn sync_directory(dir: &Dir) {
    // Best effort: some platforms refuse to fsync directories.
    if let Err(err) = dir.open(".").and_then(|handle| handle.sync_all()) {
        tracing::debug!(error = %err, "record store directory sync skipped");
    }
}
