//! Layered configuration resolution.
//!
//! Configuration for a service is assembled from an ordered set of candidate
//! files across several roots and a version-prefix hierarchy:
//! 1. **Bundled** - the package-installed default file, when configured
//! 2. **System** - `/etc` (Linux), `/Library` (macOS), `%ProgramData%` (Windows)
//! 3. **User** - the home directory (`%APPDATA%` on Windows)
//! 4. **Local** - `<cwd>/etc`
//! 5. **Environment** - the root named by `$PYFARM_CONFIG_ROOT`
//!
//! Every root is searched at `pyfarm/<service>/`, version-free first and then
//! under each cumulative version prefix (`1`, `1.2`, `1.2.3`). Later files
//! shallow-merge over earlier ones; the reserved `env` key is routed to an
//! environment sink instead of the mapping. String values read back out pass
//! through recursive `$name` / `${name}` expansion.

mod expand;
mod loader;
mod merge;
mod search;
mod version;

pub use expand::{MAX_EXPANSION_PASSES, Namespace, expand, expand_home, substitute};
pub use loader::{Configuration, EnvironmentMap, FILE_EXTENSION, PARENT_APPLICATION_NAME};
pub use merge::{OVERLAY_KEY, extract_overlay, shallow_merge};
pub use search::{
    ENVIRONMENT_PATH_VARIABLE, LOCAL_DIRECTORY_NAME, SearchRoots, directories, directories_with,
    files,
};
pub use version::{split_version, split_version_dotted};
