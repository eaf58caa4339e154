//! Supported platforms and the per-platform data behind the main.js patch.
//!
//! Platform behavior is data, not branching: each platform maps to a fixed
//! patch record (or none), and path construction keys off the same enum.

use std::fmt;

/// The platforms the tool knows how to handle. Anything that is not
/// Windows or macOS is treated as Linux, matching where Cursor stores its
/// configuration on other Unix-likes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// Platform the current process is running on.
    pub fn current() -> Self {
        #[cfg(target_os = "windows")]
        return Self::Windows;

        #[cfg(target_os = "macos")]
        return Self::MacOs;

        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        Self::Linux
    }

    /// Patch data for the bundled main.js, or `None` where the patch step
    /// is not supported (Linux).
    pub fn patch_spec(self) -> Option<&'static PatchSpec> {
        match self {
            Self::MacOs => Some(&MACOS_PATCH),
            Self::Windows => Some(&WINDOWS_PATCH),
            Self::Linux => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Windows => "windows",
            Self::MacOs => "macos",
            Self::Linux => "linux",
        };
        f.write_str(name)
    }
}

/// How a patch source is matched inside the script text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Regex built from the escaped source text.
    Pattern,
    /// Exact substring replacement.
    Literal,
}

/// One platform's patch: the command Cursor runs to read a hardware
/// identifier, the replacement that emits a random one instead, and the
/// marker whose presence in the written file proves the patch landed.
#[derive(Debug, Clone, Copy)]
pub struct PatchSpec {
    pub source: &'static str,
    pub replacement: &'static str,
    pub marker: &'static str,
    pub kind: MatchKind,
}

// On macOS Cursor shells out to ioreg for the IOPlatformUUID; the
// replacement emits a fresh lowercase UUID in the same "IOPlatformUUID = ..."
// shape the surrounding script parses.
const MACOS_REPLACEMENT: &str =
    r#"UUID=$(uuidgen | tr '[:upper:]' '[:lower:]');echo \"IOPlatformUUID = \"$UUID\";"#;

const MACOS_PATCH: PatchSpec = PatchSpec {
    source: "ioreg -rd1 -c IOPlatformExpertDevice",
    replacement: MACOS_REPLACEMENT,
    marker: MACOS_REPLACEMENT,
    kind: MatchKind::Pattern,
};

// On Windows the script queries the registry MachineGuid through REG.exe;
// the source text below is the exact escaped form embedded in main.js.
const WINDOWS_REPLACEMENT: &str =
    r#"powershell -Command "[guid]::NewGuid().ToString().ToLower()""#;

const WINDOWS_PATCH: PatchSpec = PatchSpec {
    source: r"${v5[s$()]}\\REG.exe QUERY HKEY_LOCAL_MACHINE\\SOFTWARE\\Microsoft\\Cryptography /v MachineGuid",
    replacement: WINDOWS_REPLACEMENT,
    marker: WINDOWS_REPLACEMENT,
    kind: MatchKind::Literal,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_spec_per_platform() {
        let macos = Platform::MacOs.patch_spec().expect("macOS patch data");
        assert_eq!(macos.kind, MatchKind::Pattern);
        assert_eq!(macos.marker, macos.replacement);

        let windows = Platform::Windows.patch_spec().expect("Windows patch data");
        assert_eq!(windows.kind, MatchKind::Literal);
        assert_eq!(windows.marker, windows.replacement);

        assert!(Platform::Linux.patch_spec().is_none());
    }

    #[test]
    fn test_windows_source_is_the_escaped_script_form() {
        // The registry query is embedded in main.js with doubled backslashes
        // and a template prefix; the source must carry them verbatim.
        let windows = Platform::Windows.patch_spec().unwrap();
        assert!(windows.source.starts_with("${v5[s$()]}"));
        assert!(windows.source.contains(r"\\REG.exe"));
    }
}
