//! Platform resolution.
//!
//! Baselines may differ per operating system (font rasterization, codec
//! builds), so a run first decides which platform's baseline applies.

use std::fmt;

/// The platforms a baseline can be recorded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    MacOs,
    Linux,
    Windows,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::MacOs, Platform::Linux, Platform::Windows];

    /// Directory name used under a game's baseline root.
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::MacOs => "macos",
            Platform::Linux => "linux",
            Platform::Windows => "windows",
        }
    }

    /// Parses one of the three canonical names (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(name))
    }

    /// Maps a CI runner description by substring ("macOS-14", "windows-latest").
    fn from_runner_hint(hint: &str) -> Option<Self> {
        let hint = hint.to_ascii_lowercase();
        if hint.contains("mac") {
            Some(Platform::MacOs)
        } else if hint.contains("win") {
            Some(Platform::Windows)
        } else if hint.contains("linux") {
            Some(Platform::Linux)
        } else {
            None
        }
    }

    /// Maps a native OS identifier. Anything unrecognized is Linux.
    fn from_native(os: &str) -> Self {
        match os.trim().to_ascii_lowercase().as_str() {
            "darwin" | "macos" => Platform::MacOs,
            "win32" | "windows" => Platform::Windows,
            _ => Platform::Linux,
        }
    }

    /// Native OS identifier of this build, in the form `resolve_platform` takes.
    pub fn native_os() -> &'static str {
        std::env::consts::OS
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves the platform with precedence explicit > CI hint > native OS.
///
/// An explicit value that is not one of the known names is ignored (with a
/// warning) rather than treated as an error; resolution always succeeds.
pub fn resolve_platform(explicit: Option<&str>, ci_hint: Option<&str>, native_os: &str) -> Platform {
    if let Some(raw) = explicit {
        match Platform::from_name(raw) {
            Some(platform) => {
                log::debug!("Platform '{platform}' taken from explicit override");
                return platform;
            }
            None => log::warn!("Ignoring unknown platform override '{raw}'"),
        }
    }

    if let Some(platform) = ci_hint.and_then(Platform::from_runner_hint) {
        log::debug!("Platform '{platform}' taken from CI runner hint");
        return platform;
    }

    let platform = Platform::from_native(native_os);
    log::debug!("Platform '{platform}' taken from native OS '{native_os}'");
    platform
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_override_wins() {
        assert_eq!(
            resolve_platform(Some("windows"), Some("macOS"), "linux"),
            Platform::Windows
        );
        assert_eq!(resolve_platform(Some("MacOS"), None, "win32"), Platform::MacOs);
    }

    #[test]
    fn test_unknown_override_falls_through() {
        assert_eq!(
            resolve_platform(Some("beos"), Some("Windows"), "darwin"),
            Platform::Windows
        );
        assert_eq!(resolve_platform(Some("beos"), None, "darwin"), Platform::MacOs);
    }

    #[test]
    fn test_runner_hint_substrings() {
        assert_eq!(resolve_platform(None, Some("macos-14"), "linux"), Platform::MacOs);
        assert_eq!(resolve_platform(None, Some("Windows"), "linux"), Platform::Windows);
        assert_eq!(resolve_platform(None, Some("ubuntu-linux"), "darwin"), Platform::Linux);
        assert_eq!(resolve_platform(None, Some("freebsd"), "darwin"), Platform::MacOs);
    }

    #[test]
    fn test_native_mapping() {
        assert_eq!(resolve_platform(None, None, "darwin"), Platform::MacOs);
        assert_eq!(resolve_platform(None, None, "win32"), Platform::Windows);
        assert_eq!(resolve_platform(None, None, "linux"), Platform::Linux);
        assert_eq!(resolve_platform(None, None, "sunos"), Platform::Linux);
    }
}
