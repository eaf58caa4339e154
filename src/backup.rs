//! Timestamped file backups taken before any mutation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::debug;

/// Copies `path` to a sibling named `<original>.backup_<YYYYMMDD_HHMMSS>`
/// and returns the backup's path.
///
/// A missing original is a silent no-op (`Ok(None)`), not an error.
/// Backups are never deleted by this tool; two calls within the same
/// second land on the same name and the later copy wins, which is
/// accepted.
pub fn backup_file(path: &Path) -> io::Result<Option<PathBuf>> {
    if !path.exists() {
        debug!(path = %path.display(), "Nothing to back up");
        return Ok(None);
    }

    let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = timestamped_sibling(path, &stamp);
    fs::copy(path, &backup_path)?;
    Ok(Some(backup_path))
}

/// Appends `.backup_<stamp>` to the full file name, keeping the original
/// extension visible in the backup's name.
fn timestamped_sibling(path: &Path, stamp: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".backup_{stamp}"));
    PathBuf::from(name)
}
