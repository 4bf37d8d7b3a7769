//! Platform identification and default configuration roots.
//!
//! The search machinery only needs two facts about the host: where system-wide
//! configuration lives and where per-user configuration lives. Both are
//! resolved here so the rest of the crate never touches `cfg!` directly.

use std::path::PathBuf;
use tracing::warn;

/// The platform the process is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
    Unknown,
}

impl Platform {
    /// Identify the current platform at compile time.
    pub const fn current() -> Self {
        if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Unknown
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Linux => write!(f, "linux"),
            Platform::MacOs => write!(f, "macos"),
            Platform::Windows => write!(f, "windows"),
            Platform::Unknown => write!(f, "unknown"),
        }
    }
}

/// Default system-level configuration root for the current platform.
///
/// Linux: `/etc`, macOS: `/Library`, Windows: `%ProgramData%` with an
/// `%APPDATA%` fallback for older layouts. An unidentified platform yields
/// `None`, which degrades search rather than failing it.
pub fn system_root() -> Option<PathBuf> {
    system_root_for(Platform::current())
}

pub(crate) fn system_root_for(platform: Platform) -> Option<PathBuf> {
    match platform {
        Platform::Linux => Some(PathBuf::from("/etc")),
        Platform::MacOs => Some(PathBuf::from("/Library")),
        Platform::Windows => std::env::var_os("ProgramData")
            .or_else(|| std::env::var_os("APPDATA"))
            .map(PathBuf::from),
        Platform::Unknown => {
            warn!("failed to determine default configuration root");
            None
        }
    }
}

/// Default user-level configuration root for the current platform.
///
/// The home directory on Linux and macOS, `%APPDATA%` on Windows.
pub fn user_root() -> Option<PathBuf> {
    match Platform::current() {
        Platform::Linux | Platform::MacOs => dirs::home_dir(),
        Platform::Windows => std::env::var_os("APPDATA").map(PathBuf::from),
        Platform::Unknown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_platform_is_stable() {
        assert_eq!(Platform::current(), Platform::current());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_system_root() {
        assert_eq!(system_root(), Some(PathBuf::from("/etc")));
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn macos_system_root() {
        assert_eq!(system_root(), Some(PathBuf::from("/Library")));
    }

    #[test]
    fn unknown_platform_has_no_roots() {
        assert_eq!(system_root_for(Platform::Unknown), None);
    }

    #[cfg(any(target_os = "linux", target_os = "macos"))]
    #[test]
    fn user_root_is_home() {
        assert_eq!(user_root(), dirs::home_dir());
    }
}
