//! Patches the hardware-identifier command inside Cursor's main.js.
//!
//! The bundled script shells out to read a machine identifier; the patch
//! swaps that command for one emitting a random identifier in the same
//! textual shape. Failures here are soft: the caller reports them and the
//! run carries on.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use regex::{NoExpand, Regex};
use thiserror::Error;
use tracing::{info, warn};

use crate::backup;
use crate::platform::{MatchKind, PatchSpec, Platform};

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Outcome of a patch attempt. Only `Patched` means the success marker
/// was verified in the written content.
#[derive(Debug)]
pub enum PatchOutcome {
    /// Marker verified present in the written file.
    Patched { backup: Option<PathBuf> },
    /// File was rewritten but the marker is missing, most likely because
    /// the source command changed in a newer Cursor build.
    MarkerMissing { backup: Option<PathBuf> },
    /// No patch data exists for this platform.
    Unsupported,
    /// The script path could not be resolved or points at nothing.
    ScriptMissing,
}

/// Applies the per-platform substitution to the script at `path`,
/// backing the file up first and verifying the marker afterwards.
pub fn patch_main_js(platform: Platform, path: Option<&Path>) -> Result<PatchOutcome, PatchError> {
    let Some(spec) = platform.patch_spec() else {
        warn!(%platform, "Patching main.js is not supported on this platform");
        return Ok(PatchOutcome::Unsupported);
    };
    let Some(path) = path else {
        warn!("main.js location could not be resolved");
        return Ok(PatchOutcome::ScriptMissing);
    };
    if !path.exists() {
        warn!(path = %path.display(), "main.js does not exist");
        return Ok(PatchOutcome::ScriptMissing);
    }

    let backup = backup::backup_file(path)?;
    let content = fs::read_to_string(path)?;
    let patched = apply_patch(spec, &content);
    fs::write(path, &patched)?;

    if patched.contains(spec.marker) {
        info!(path = %path.display(), "main.js patched");
        Ok(PatchOutcome::Patched { backup })
    } else {
        warn!(
            path = %path.display(),
            "main.js may not have been modified; the expected command was not found"
        );
        if let Some(backup) = &backup {
            warn!(backup = %backup.display(), "Original content is available in the backup");
        }
        Ok(PatchOutcome::MarkerMissing { backup })
    }
}

/// Replaces every occurrence of the spec's source command.
///
/// The source is always matched verbatim: `Pattern` builds a regex from
/// the escaped source so none of its characters act as metacharacters,
/// and inserts the replacement with `NoExpand` so `$` stays literal.
/// `Literal` is a plain substring replacement.
fn apply_patch(spec: &PatchSpec, content: &str) -> String {
    match spec.kind {
        MatchKind::Pattern => {
            let re = Regex::new(&regex::escape(spec.source))
                .expect("escaped command is a valid pattern");
            re.replace_all(content, NoExpand(spec.replacement)).into_owned()
        }
        MatchKind::Literal => content.replace(spec.source, spec.replacement),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn macos_spec() -> &'static PatchSpec {
        Platform::MacOs.patch_spec().unwrap()
    }

    fn windows_spec() -> &'static PatchSpec {
        Platform::Windows.patch_spec().unwrap()
    }

    #[test]
    fn test_macos_pattern_is_replaced_and_dollar_survives() {
        let spec = macos_spec();
        let content = format!("before {} after", spec.source);

        let patched = apply_patch(spec, &content);

        assert!(!patched.contains(spec.source));
        assert!(patched.contains(spec.marker));
        // $UUID must land literally, not be expanded as a capture group.
        assert!(patched.contains("$UUID"));
    }

    #[test]
    fn test_windows_literal_replaces_all_occurrences() {
        let spec = windows_spec();
        let content = format!("x {} y {} z", spec.source, spec.source);

        let patched = apply_patch(spec, &content);

        assert!(!patched.contains(spec.source));
        assert_eq!(patched.matches(spec.marker).count(), 2);
    }

    #[test]
    fn test_patch_writes_file_and_creates_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.js");
        let spec = macos_spec();
        fs::write(&path, format!("exec('{}')", spec.source)).unwrap();

        let outcome = patch_main_js(Platform::MacOs, Some(&path)).unwrap();

        let backup = match outcome {
            PatchOutcome::Patched { backup } => backup.expect("backup of existing file"),
            other => panic!("expected Patched, got {other:?}"),
        };
        assert!(fs::read_to_string(&path).unwrap().contains(spec.marker));
        assert!(fs::read_to_string(&backup).unwrap().contains(spec.source));
    }

    #[test]
    fn test_missing_pattern_rewrites_unchanged_and_reports_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.js");
        fs::write(&path, "nothing to see here").unwrap();

        let outcome = patch_main_js(Platform::MacOs, Some(&path)).unwrap();

        assert!(matches!(outcome, PatchOutcome::MarkerMissing { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "nothing to see here");
    }

    #[test]
    fn test_marker_already_present_verifies_without_change() {
        // Re-running against an already patched script finds no source
        // command but still verifies, since verification only checks for
        // the marker.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.js");
        let spec = macos_spec();
        fs::write(&path, format!("exec('{}')", spec.replacement)).unwrap();

        let outcome = patch_main_js(Platform::MacOs, Some(&path)).unwrap();

        assert!(matches!(outcome, PatchOutcome::Patched { .. }));
    }

    #[test]
    fn test_missing_script_and_unsupported_platform_are_soft() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("main.js");

        let outcome = patch_main_js(Platform::MacOs, Some(&absent)).unwrap();
        assert!(matches!(outcome, PatchOutcome::ScriptMissing));

        let outcome = patch_main_js(Platform::MacOs, None).unwrap();
        assert!(matches!(outcome, PatchOutcome::ScriptMissing));

        let outcome = patch_main_js(Platform::Linux, None).unwrap();
        assert!(matches!(outcome, PatchOutcome::Unsupported));
    }
}
