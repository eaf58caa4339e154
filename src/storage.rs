//! Rewrites the telemetry identifiers inside Cursor's storage.json.
//!
//! The file is a flat JSON object keyed by dotted names. Only the four
//! telemetry identifier keys are overwritten; every other key is carried
//! through the rewrite untouched.

use std::fs;
use std::io;
use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::ids::IdentifierSet;

pub const MACHINE_ID_KEY: &str = "telemetry.machineId";
pub const MAC_MACHINE_ID_KEY: &str = "telemetry.macMachineId";
pub const DEV_DEVICE_ID_KEY: &str = "telemetry.devDeviceId";
pub const SQM_ID_KEY: &str = "telemetry.sqmId";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What was found at the storage path before rewriting. Absence and
/// malformed content are expected states, not errors.
#[derive(Debug)]
pub enum StorageDocument {
    /// Parsed as a JSON object.
    Present(Map<String, Value>),
    /// No file at the path.
    Absent,
    /// File exists but does not parse as a JSON object; its content is
    /// discarded on rewrite.
    Unparsable,
}

impl StorageDocument {
    fn into_map(self) -> Map<String, Value> {
        match self {
            Self::Present(map) => map,
            Self::Absent | Self::Unparsable => Map::new(),
        }
    }
}

/// Loads the current storage document. Only a genuine read failure
/// (permissions and the like) is an error; a missing file or malformed
/// JSON maps to the matching variant.
pub fn load_document(path: &Path) -> io::Result<StorageDocument> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(StorageDocument::Absent),
        Err(err) => return Err(err),
    };
    match serde_json::from_str::<Value>(&data) {
        Ok(Value::Object(map)) => Ok(StorageDocument::Present(map)),
        Ok(_) | Err(_) => {
            warn!(path = %path.display(), "Existing storage file is not a JSON object, starting fresh");
            Ok(StorageDocument::Unparsable)
        }
    }
}

/// Merges `ids` into the document at `path` and writes the result back,
/// creating the parent directory and the file as needed.
pub fn apply(path: &Path, ids: &IdentifierSet) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut map = load_document(path)?.into_map();
    map.insert(MACHINE_ID_KEY.to_string(), Value::String(ids.machine_id.clone()));
    map.insert(
        MAC_MACHINE_ID_KEY.to_string(),
        Value::String(ids.mac_machine_id.clone()),
    );
    map.insert(
        DEV_DEVICE_ID_KEY.to_string(),
        Value::String(ids.dev_device_id.clone()),
    );
    map.insert(SQM_ID_KEY.to_string(), Value::String(ids.sqm_id.clone()));

    let data = serde_json::to_string_pretty(&Value::Object(map))?;
    fs::write(path, data)?;
    debug!(path = %path.display(), "Storage file rewritten");
    Ok(())
}
