//! Layered configuration for the PyFarm render-farm toolset.
//!
//! Locates a service's configuration files across system, user, process-local,
//! and environment-override roots (plus a bundled default), merges them with
//! well-defined precedence, and expands `$variable` templates in the values it
//! hands back.
//!
//! ```no_run
//! use pyfarm_config::config::{Configuration, EnvironmentMap};
//!
//! let mut env = EnvironmentMap::new();
//! let mut config = Configuration::new("agent", Some("1.2.3"));
//! config.load(Some(&mut env))?;
//!
//! let port = config.get_or("port", 9091.into());
//! # Ok::<(), pyfarm_config::error::ConfigError>(())
//! ```

pub mod config;
pub mod env;
pub mod error;
pub mod platform;
pub mod scratch;

pub use config::{Configuration, EnvironmentMap, SearchRoots};
pub use error::{ConfigError, ConfigResult};
pub use platform::Platform;
pub use scratch::ScratchDir;
