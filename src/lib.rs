//! Resets the identifiers Cursor persists for usage tracking.
//!
//! Two files are touched: storage.json, where four fresh telemetry
//! identifiers are merged in over the existing content, and (on macOS and
//! Windows) the bundled main.js, where the command reading a hardware
//! identifier is swapped for one producing a random value. Both files are
//! backed up before they are modified.

pub mod backup;
pub mod ids;
pub mod paths;
pub mod patch;
pub mod platform;
pub mod storage;

use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::ids::IdentifierSet;
use crate::platform::Platform;

#[derive(Debug, Error)]
pub enum ResetError {
    #[error(transparent)]
    Path(#[from] paths::PathError),
    #[error("failed to back up storage file: {0}")]
    Backup(#[source] io::Error),
    #[error("failed to rewrite storage file: {0}")]
    Storage(#[from] storage::StorageError),
}

/// Runs the full reset sequence for the platform the process is on.
pub fn run() -> Result<(), ResetError> {
    let platform = Platform::current();
    let storage_path = paths::storage_json_path(platform)?;
    let main_js_path = paths::main_js_path(platform);
    reset(platform, &storage_path, main_js_path.as_deref())
}

/// Reset sequence against explicit paths: back up storage.json, merge
/// fresh identifiers into it, then patch main.js where the platform
/// supports it. The patch is best-effort; only storage failures abort.
pub fn reset(
    platform: Platform,
    storage_path: &Path,
    main_js_path: Option<&Path>,
) -> Result<(), ResetError> {
    info!(path = %storage_path.display(), "Storage file");

    if let Some(backup_path) = backup::backup_file(storage_path).map_err(ResetError::Backup)? {
        info!(path = %backup_path.display(), "Created backup");
    }

    let ids = IdentifierSet::generate();
    storage::apply(storage_path, &ids)?;
    info!(value = %ids.machine_id, "New machineId");
    info!(value = %ids.mac_machine_id, "New macMachineId");
    info!(value = %ids.dev_device_id, "New devDeviceId");

    if platform.patch_spec().is_some() {
        if let Err(err) = patch::patch_main_js(platform, main_js_path) {
            warn!(error = %err, "Patching main.js failed");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::fs;

    #[test]
    fn test_reset_creates_storage_from_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let storage_path = dir.path().join("globalStorage").join("storage.json");

        reset(Platform::Linux, &storage_path, None).unwrap();

        let data = fs::read_to_string(&storage_path).unwrap();
        let map = match serde_json::from_str::<Value>(&data).unwrap() {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other:?}"),
        };
        assert_eq!(map.len(), 4);
        for key in [
            storage::MACHINE_ID_KEY,
            storage::MAC_MACHINE_ID_KEY,
            storage::DEV_DEVICE_ID_KEY,
            storage::SQM_ID_KEY,
        ] {
            assert!(map.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn test_reset_patches_script_on_supported_platform() {
        let dir = tempfile::tempdir().unwrap();
        let storage_path = dir.path().join("storage.json");
        let main_js = dir.path().join("main.js");
        let spec = Platform::MacOs.patch_spec().unwrap();
        fs::write(&main_js, format!("run('{}')", spec.source)).unwrap();

        reset(Platform::MacOs, &storage_path, Some(&main_js)).unwrap();

        let patched = fs::read_to_string(&main_js).unwrap();
        assert!(patched.contains(spec.marker));
        assert!(!patched.contains(spec.source));
    }

    #[test]
    fn test_reset_survives_a_missing_script() {
        let dir = tempfile::tempdir().unwrap();
        let storage_path = dir.path().join("storage.json");

        reset(Platform::MacOs, &storage_path, None).unwrap();

        assert!(storage_path.exists());
    }
}
