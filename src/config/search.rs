//! Candidate directory and file enumeration.
//!
//! Resolution walks a fixed set of roots (system, user, process-local,
//! environment override) crossed with a version-prefix hierarchy. The
//! resulting order is the merge order: later candidates override earlier
//! ones, so the most specific file under the highest-precedence root wins.

use super::version::split_version_dotted;
use crate::platform;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming an extra search root.
pub const ENVIRONMENT_PATH_VARIABLE: &str = "PYFARM_CONFIG_ROOT";

/// Directory name searched relative to the working directory.
pub const LOCAL_DIRECTORY_NAME: &str = "etc";

/// The ordered set of search roots, any of which may be absent.
///
/// Order is significant: system, then user, then process-local, then the
/// environment override — each later root takes precedence over the ones
/// before it when files are merged.
#[derive(Debug, Clone, Default)]
pub struct SearchRoots {
    pub system: Option<PathBuf>,
    pub user: Option<PathBuf>,
    pub local: Option<PathBuf>,
    pub environment: Option<PathBuf>,
}

impl SearchRoots {
    /// Discover roots from the platform policy and the environment.
    ///
    /// The process-local root is `<cwd>/etc` (relative `etc` when no working
    /// directory is supplied). The environment root comes from
    /// `$PYFARM_CONFIG_ROOT` and is absent when the variable is unset.
    pub fn discover(cwd: Option<&Path>) -> Self {
        let local = match cwd {
            Some(dir) => dir.join(LOCAL_DIRECTORY_NAME),
            None => PathBuf::from(LOCAL_DIRECTORY_NAME),
        };
        Self {
            system: platform::system_root(),
            user: platform::user_root(),
            local: Some(local),
            environment: std::env::var_os(ENVIRONMENT_PATH_VARIABLE).map(PathBuf::from),
        }
    }

    /// No roots at all. Useful as a base for tests and embedders.
    pub fn none() -> Self {
        Self::default()
    }

    /// Present roots in precedence order (lowest first).
    pub fn ordered(&self) -> Vec<&Path> {
        [&self.system, &self.user, &self.local, &self.environment]
            .into_iter()
            .filter_map(|root| root.as_deref())
            .collect()
    }
}

/// Enumerate candidate configuration directories.
///
/// Produces `roots × versions` in root-major order, with the version-free
/// directory first within each root followed by increasingly specific
/// version prefixes. `validate` drops candidates that do not exist on disk
/// without reordering the survivors; `unversioned_only` ignores `version`
/// entirely. No roots means no candidates, which is degraded but not fatal.
pub fn directories(
    roots: &SearchRoots,
    child_path: &Path,
    version: Option<&str>,
    validate: bool,
    unversioned_only: bool,
) -> Vec<PathBuf> {
    directories_with(
        roots,
        child_path,
        version,
        validate,
        unversioned_only,
        split_version_dotted,
    )
}

/// [`directories`] with a caller-supplied version splitter.
pub fn directories_with(
    roots: &SearchRoots,
    child_path: &Path,
    version: Option<&str>,
    validate: bool,
    unversioned_only: bool,
    split: impl Fn(&str) -> Vec<String>,
) -> Vec<PathBuf> {
    // The empty string is the version-free directory; it always comes first.
    let mut versions = vec![String::new()];
    if !unversioned_only
        && let Some(version) = version
    {
        versions.extend(split(version));
    }

    let mut results = Vec::new();
    for root in roots.ordered() {
        let base = root.join(child_path);
        for version in &versions {
            let candidate = if version.is_empty() {
                base.clone()
            } else {
                base.join(version)
            };
            if !validate || candidate.is_dir() {
                results.push(candidate);
            }
        }
    }

    if results.is_empty() {
        debug!("no configuration directories were found");
    } else {
        debug!("found {} configuration directories", results.len());
    }
    results
}

/// Enumerate candidate configuration files.
///
/// The bundled default file is always the first candidate when it is
/// configured (and, when validating, present); every directory candidate
/// then contributes `<dir>/<filename>`. With `validate` unset this returns
/// everywhere resolution would look, which is the useful answer for
/// diagnostics.
pub fn files(
    roots: &SearchRoots,
    child_path: &Path,
    filename: &str,
    bundled: Option<&Path>,
    version: Option<&str>,
    validate: bool,
    unversioned_only: bool,
) -> Vec<PathBuf> {
    let mut results = Vec::new();

    if let Some(bundled) = bundled
        && (!validate || bundled.is_file())
    {
        results.push(bundled.to_path_buf());
    }

    for dir in directories(roots, child_path, version, validate, unversioned_only) {
        let candidate = dir.join(filename);
        if !validate || candidate.is_file() {
            results.push(candidate);
        }
    }

    if results.is_empty() {
        warn!("no configuration files found");
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn two_roots(temp: &TempDir) -> SearchRoots {
        SearchRoots {
            system: Some(temp.path().join("system")),
            user: Some(temp.path().join("user")),
            ..SearchRoots::none()
        }
    }

    #[test]
    fn unfiltered_count_is_roots_times_versions() {
        let temp = TempDir::new().unwrap();
        let roots = two_roots(&temp);
        let child = Path::new("pyfarm/agent");

        // 2 roots x (version-free + 3 prefixes)
        let dirs = directories(&roots, child, Some("1.2.3"), false, false);
        assert_eq!(dirs.len(), 8);
    }

    #[test]
    fn root_major_version_minor_order() {
        let temp = TempDir::new().unwrap();
        let roots = two_roots(&temp);
        let child = Path::new("pyfarm/agent");

        let dirs = directories(&roots, child, Some("1.2"), false, false);
        let expected = [
            temp.path().join("system/pyfarm/agent"),
            temp.path().join("system/pyfarm/agent/1"),
            temp.path().join("system/pyfarm/agent/1.2"),
            temp.path().join("user/pyfarm/agent"),
            temp.path().join("user/pyfarm/agent/1"),
            temp.path().join("user/pyfarm/agent/1.2"),
        ];
        assert_eq!(dirs, expected);
    }

    #[test]
    fn environment_root_comes_last() {
        let temp = TempDir::new().unwrap();
        let roots = SearchRoots {
            system: Some(temp.path().join("system")),
            environment: Some(temp.path().join("override")),
            ..SearchRoots::none()
        };

        let dirs = directories(&roots, Path::new("pyfarm/agent"), None, false, false);
        assert_eq!(
            dirs,
            [
                temp.path().join("system/pyfarm/agent"),
                temp.path().join("override/pyfarm/agent"),
            ]
        );
    }

    #[test]
    fn no_version_means_version_free_only() {
        let temp = TempDir::new().unwrap();
        let roots = two_roots(&temp);

        let dirs = directories(&roots, Path::new("pyfarm/agent"), None, false, false);
        assert_eq!(dirs.len(), 2);
    }

    #[test]
    fn unversioned_only_ignores_version() {
        let temp = TempDir::new().unwrap();
        let roots = two_roots(&temp);

        let dirs = directories(&roots, Path::new("pyfarm/agent"), Some("1.2.3"), false, true);
        assert_eq!(dirs.len(), 2);
    }

    #[test]
    fn zero_roots_is_empty_not_an_error() {
        let dirs = directories(
            &SearchRoots::none(),
            Path::new("pyfarm/agent"),
            Some("1.2.3"),
            false,
            false,
        );
        assert!(dirs.is_empty());
    }

    #[test]
    fn validation_filters_without_reordering() {
        let temp = TempDir::new().unwrap();
        let roots = two_roots(&temp);
        let child = Path::new("pyfarm/agent");

        // Only the version-free system dir and the most specific user dir exist.
        std::fs::create_dir_all(temp.path().join("system/pyfarm/agent")).unwrap();
        std::fs::create_dir_all(temp.path().join("user/pyfarm/agent/1.2.3")).unwrap();

        let all = directories(&roots, child, Some("1.2.3"), false, false);
        let existing = directories(&roots, child, Some("1.2.3"), true, false);

        assert_eq!(
            existing,
            [
                temp.path().join("system/pyfarm/agent"),
                temp.path().join("user/pyfarm/agent/1.2.3"),
            ]
        );
        // The retained subsequence preserves the unfiltered order.
        let mut unfiltered = all.iter().filter(|path| existing.contains(*path));
        assert!(existing.iter().all(|path| unfiltered.next() == Some(path)));
    }

    #[test]
    fn injectable_splitter() {
        let temp = TempDir::new().unwrap();
        let roots = SearchRoots {
            system: Some(temp.path().join("system")),
            ..SearchRoots::none()
        };

        let dirs = directories_with(
            &roots,
            Path::new("pyfarm/agent"),
            Some("ignored"),
            false,
            false,
            |_| vec!["x".to_string()],
        );
        assert_eq!(
            dirs,
            [
                temp.path().join("system/pyfarm/agent"),
                temp.path().join("system/pyfarm/agent/x"),
            ]
        );
    }

    #[test]
    fn files_appends_filename_and_prepends_bundled() {
        let temp = TempDir::new().unwrap();
        let roots = SearchRoots {
            system: Some(temp.path().join("system")),
            ..SearchRoots::none()
        };
        let bundled = temp.path().join("bundled/agent.yml");

        let candidates = files(
            &roots,
            Path::new("pyfarm/agent"),
            "agent.yml",
            Some(&bundled),
            Some("1"),
            false,
            false,
        );
        assert_eq!(
            candidates,
            [
                bundled.clone(),
                temp.path().join("system/pyfarm/agent/agent.yml"),
                temp.path().join("system/pyfarm/agent/1/agent.yml"),
            ]
        );
    }

    #[test]
    fn files_validation_requires_existing_files() {
        let temp = TempDir::new().unwrap();
        let roots = SearchRoots {
            system: Some(temp.path().join("system")),
            ..SearchRoots::none()
        };

        let dir = temp.path().join("system/pyfarm/agent/1");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("agent.yml"), "foo: 1\n").unwrap();
        // Directory exists but holds no config file.
        std::fs::create_dir_all(temp.path().join("system/pyfarm/agent")).unwrap();

        let candidates = files(
            &roots,
            Path::new("pyfarm/agent"),
            "agent.yml",
            None,
            Some("1"),
            true,
            false,
        );
        assert_eq!(candidates, [dir.join("agent.yml")]);
    }

    #[test]
    fn missing_bundled_file_is_skipped_when_validating() {
        let temp = TempDir::new().unwrap();
        let bundled = temp.path().join("nowhere/agent.yml");

        let candidates = files(
            &SearchRoots::none(),
            Path::new("pyfarm/agent"),
            "agent.yml",
            Some(&bundled),
            None,
            true,
            false,
        );
        assert!(candidates.is_empty());
    }
}
