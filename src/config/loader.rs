//! The `Configuration` type: discovery, loading, and merged reads.

use super::expand::{self, Namespace, scalar_to_string};
use super::merge::{self, OVERLAY_KEY};
use super::search::{self, SearchRoots};
use crate::error::{ConfigError, ConfigResult};
use crate::scratch::ScratchDir;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Application name prefixed to every service's search path.
pub const PARENT_APPLICATION_NAME: &str = "pyfarm";

/// Extension of configuration files.
pub const FILE_EXTENSION: &str = ".yml";

/// Environment sink that `load()` routes overlay data into.
pub type EnvironmentMap = Map<String, Value>;

/// A merged, layered configuration for one service.
///
/// Composes an ordered mapping with the metadata needed to resolve it:
/// service name, optional version, search roots, and the bundled default
/// file. Candidate directories and files are recomputed on every call, so
/// mutating [`roots_mut`](Self::roots_mut) between calls takes effect
/// immediately.
///
/// String values read through [`get`](Self::get), [`get_or`](Self::get_or),
/// and [`require`](Self::require) pass through variable expansion;
/// [`get_raw`](Self::get_raw) bypasses it.
#[derive(Debug, Clone)]
pub struct Configuration {
    service_name: String,
    version: Option<String>,
    roots: SearchRoots,
    child_path: PathBuf,
    bundled_path: Option<PathBuf>,
    loaded_files: Vec<PathBuf>,
    values: Map<String, Value>,
    scratch: ScratchDir,
}

impl Configuration {
    /// Configuration for `service_name`, discovering roots from the platform
    /// and environment.
    ///
    /// Passing no version disables version-scoped directory search; the
    /// version-free directories are still consulted.
    pub fn new(service_name: &str, version: Option<&str>) -> Self {
        Self::new_in(service_name, version, None)
    }

    /// Like [`new`](Self::new), with an explicit working directory for the
    /// process-local `etc` root.
    pub fn new_in(service_name: &str, version: Option<&str>, cwd: Option<&Path>) -> Self {
        Self {
            service_name: service_name.to_string(),
            version: version.map(str::to_string),
            roots: SearchRoots::discover(cwd),
            child_path: Path::new(PARENT_APPLICATION_NAME).join(service_name),
            bundled_path: None,
            loaded_files: Vec::new(),
            values: Map::new(),
            scratch: ScratchDir::for_service(service_name),
        }
    }

    /// Construct with the version detected from `PYFARM_<SERVICE>_VERSION`.
    ///
    /// Fails with [`ConfigError::NoVersionInfo`] when the variable is unset —
    /// callers that can tolerate unversioned search should use
    /// [`new`](Self::new) with `None` instead.
    pub fn with_detected_version(service_name: &str) -> ConfigResult<Self> {
        let var = format!(
            "PYFARM_{}_VERSION",
            service_name.to_uppercase().replace('-', "_")
        );
        let version = std::env::var(&var)
            .map_err(|_| ConfigError::NoVersionInfo(service_name.to_string()))?;
        Ok(Self::new(service_name, Some(&version)))
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// `<service_name>.yml`
    pub fn filename(&self) -> String {
        format!("{}{}", self.service_name, FILE_EXTENSION)
    }

    /// `pyfarm/<service_name>`, appended to every root.
    pub fn child_path(&self) -> &Path {
        &self.child_path
    }

    pub fn roots(&self) -> &SearchRoots {
        &self.roots
    }

    /// Mutable access to the search roots. Changes apply to the next
    /// enumeration or load; nothing is cached.
    pub fn roots_mut(&mut self) -> &mut SearchRoots {
        &mut self.roots
    }

    /// Package-bundled default file, consulted before all root candidates.
    pub fn set_bundled_path(&mut self, path: Option<PathBuf>) {
        self.bundled_path = path;
    }

    pub fn bundled_path(&self) -> Option<&Path> {
        self.bundled_path.as_deref()
    }

    /// Replace the scratch directory backing `$temp` expansion.
    pub fn set_scratch_dir(&mut self, scratch: ScratchDir) {
        self.scratch = scratch;
    }

    /// Candidate configuration directories, in merge order.
    pub fn directories(&self, validate: bool, unversioned_only: bool) -> Vec<PathBuf> {
        search::directories(
            &self.roots,
            &self.child_path,
            self.version.as_deref(),
            validate,
            unversioned_only,
        )
    }

    /// Candidate configuration files, in merge order.
    pub fn files(&self, validate: bool, unversioned_only: bool) -> Vec<PathBuf> {
        search::files(
            &self.roots,
            &self.child_path,
            &self.filename(),
            self.bundled_path.as_deref(),
            self.version.as_deref(),
            validate,
            unversioned_only,
        )
    }

    /// Read and merge every existing candidate file, in order.
    ///
    /// A file that cannot be read or parsed is logged and skipped; the rest
    /// of the load proceeds with whatever parsed. Each file's `env` overlay
    /// is routed into `environment` (discarded with a warning when no sink is
    /// supplied); its remaining top-level keys shallow-merge into the
    /// mapping, later files winning. Re-invoking re-reads and re-merges on
    /// top of the existing mapping.
    ///
    /// The only fatal error is a present-but-non-mapping overlay.
    pub fn load(&mut self, mut environment: Option<&mut EnvironmentMap>) -> ConfigResult<()> {
        let mut loaded = Vec::new();

        for file in self.files(true, false) {
            let text = match std::fs::read_to_string(&file) {
                Ok(text) => text,
                Err(err) => {
                    warn!("skipping {}: {err}", file.display());
                    continue;
                }
            };
            let document: Value = match serde_yaml::from_str(&text) {
                Ok(document) => document,
                Err(err) => {
                    warn!("skipping {}: {err}", file.display());
                    continue;
                }
            };
            let mut document = match document {
                Value::Null => {
                    debug!("skipping {}: empty document", file.display());
                    continue;
                }
                Value::Object(map) => map,
                other => {
                    warn!(
                        "skipping {}: top level is {}, expected a mapping",
                        file.display(),
                        merge::value_kind(&other)
                    );
                    continue;
                }
            };

            if let Some(overlay) = merge::extract_overlay(&mut document, &file)? {
                match environment.as_mut() {
                    Some(sink) => merge::shallow_merge(sink, overlay),
                    None => warn!(
                        "{} contains `{OVERLAY_KEY}` but no environment sink was supplied, \
                         discarding it",
                        file.display()
                    ),
                }
            }

            merge::shallow_merge(&mut self.values, document);
            debug!("loaded {}", file.display());
            loaded.push(file);
        }

        if loaded.is_empty() {
            warn!(
                "no configuration files contributed data for `{}`",
                self.service_name
            );
        }
        self.loaded_files = loaded;
        Ok(())
    }

    /// Files that contributed data during the last [`load`](Self::load), in
    /// merge order.
    pub fn loaded_files(&self) -> &[PathBuf] {
        &self.loaded_files
    }

    /// Read a value, expanding string values.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).map(|value| self.expanded(value))
    }

    /// Read a value, expanding string values, with a fallback.
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    /// Read a value that must be present, expanding string values.
    pub fn require(&self, key: &str) -> ConfigResult<Value> {
        self.get(key)
            .ok_or_else(|| ConfigError::KeyMissing(key.to_string()))
    }

    /// Read a value without expansion.
    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate raw key/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// The merged mapping, unexpanded.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Scratch directory for this service, created on first use.
    pub fn scratch_dir(&self) -> ConfigResult<&Path> {
        self.scratch.ensure()
    }

    /// Expand a template string against this configuration's namespace.
    pub fn expand(&self, raw: &str) -> String {
        expand::expand(raw, &self.namespace())
    }

    fn expanded(&self, value: &Value) -> Value {
        match value {
            Value::String(raw) => Value::String(self.expand(raw)),
            other => other.clone(),
        }
    }

    /// Assemble the substitution namespace, lowest precedence first:
    /// the scratch path as `temp`, the process environment, the `env`
    /// overlay submapping, then the mapping's own raw scalar values.
    fn namespace(&self) -> Namespace {
        let mut namespace = Namespace::new()
            .layer([(
                "temp".to_string(),
                self.scratch.path().to_string_lossy().into_owned(),
            )])
            .layer(std::env::vars());

        if let Some(Value::Object(overlay)) = self.values.get(OVERLAY_KEY) {
            namespace = namespace.layer(
                overlay
                    .iter()
                    .filter_map(|(key, value)| scalar_to_string(value).map(|s| (key.clone(), s))),
            );
        }

        namespace.layer(
            self.values
                .iter()
                .filter_map(|(key, value)| scalar_to_string(value).map(|s| (key.clone(), s))),
        )
    }
}
