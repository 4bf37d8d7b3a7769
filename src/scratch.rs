//! Per-service scratch directories.
//!
//! Each service gets a stable scratch location under the system temp
//! directory (or `$PYFARM_TMP` when set). The directory is created on demand;
//! multiple processes racing to create it is expected and harmless.

use crate::error::ConfigResult;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the scratch root.
pub const TEMP_ROOT_VARIABLE: &str = "PYFARM_TMP";

/// A process-scoped scratch directory for one service.
///
/// Owned by the [`Configuration`](crate::Configuration) that needs it rather
/// than hidden behind a module-level singleton, so tests and embedders can
/// construct their own.
#[derive(Debug, Clone)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Scratch directory for `service`, honoring `$PYFARM_TMP`.
    pub fn for_service(service: &str) -> Self {
        let root = std::env::var_os(TEMP_ROOT_VARIABLE)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("pyfarm"));
        Self {
            path: root.join(service),
        }
    }

    /// Scratch directory at an explicit location.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The scratch path. Purely computed; the directory may not exist yet.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory if needed and return its path.
    ///
    /// `create_dir_all` treats an already-existing directory as success, which
    /// also covers another process winning the creation race. Any other
    /// filesystem failure propagates.
    pub fn ensure(&self) -> ConfigResult<&Path> {
        if !self.path.is_dir() {
            debug!("creating scratch directory {}", self.path.display());
            std::fs::create_dir_all(&self.path)?;
        }
        Ok(&self.path)
    }
}
