//! Platform-specific locations of Cursor's storage.json and main.js.
//!
//! Pure path construction; nothing in this module touches the filesystem.
//! The public functions bind the host environment (home directory, Windows
//! `APPDATA`/`LOCALAPPDATA`), while the inner helpers take the base
//! directory explicitly so every platform branch is testable anywhere.

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::platform::Platform;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("could not determine home directory")]
    NoHomeDir,
    #[error("{0} environment variable is not set")]
    MissingEnvVar(&'static str),
}

/// Gets the absolute path of Cursor's storage.json for `platform`.
///
/// Windows resolves under `%APPDATA%`; macOS and Linux resolve under the
/// home directory. A missing base is an error: without it there is no
/// config file to rewrite.
pub fn storage_json_path(platform: Platform) -> Result<PathBuf, PathError> {
    let base = match platform {
        Platform::Windows => {
            env::var("APPDATA").map_err(|_| PathError::MissingEnvVar("APPDATA"))?.into()
        }
        Platform::MacOs | Platform::Linux => dirs::home_dir().ok_or(PathError::NoHomeDir)?,
    };
    Ok(storage_json_under(platform, &base))
}

/// Storage path below the per-platform base directory (`%APPDATA%` on
/// Windows, the home directory elsewhere).
fn storage_json_under(platform: Platform, base: &Path) -> PathBuf {
    let config_root = match platform {
        Platform::Windows => base.to_path_buf(),
        Platform::MacOs => base.join("Library").join("Application Support"),
        Platform::Linux => base.join(".config"),
    };
    config_root
        .join("Cursor")
        .join("User")
        .join("globalStorage")
        .join("storage.json")
}

/// Gets the absolute path of Cursor's bundled main.js, or `None` when the
/// patch step has no target on this platform (Linux) or `%LOCALAPPDATA%`
/// is unset on Windows. Both cases are expected and non-fatal.
pub fn main_js_path(platform: Platform) -> Option<PathBuf> {
    match platform {
        Platform::MacOs => Some(PathBuf::from(
            "/Applications/Cursor.app/Contents/Resources/app/out/main.js",
        )),
        Platform::Windows => {
            let local_appdata = env::var("LOCALAPPDATA").ok()?;
            Some(main_js_under(Path::new(&local_appdata)))
        }
        Platform::Linux => None,
    }
}

/// main.js path below `%LOCALAPPDATA%` on Windows.
fn main_js_under(local_appdata: &Path) -> PathBuf {
    local_appdata
        .join("Programs")
        .join("cursor")
        .join("resources")
        .join("app")
        .join("out")
        .join("main.js")
}
