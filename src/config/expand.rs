//! Recursive variable expansion for string values.
//!
//! String values read out of a configuration are treated as templates over a
//! layered namespace: the scratch directory, the process environment, the
//! configuration's `env` overlay, and finally the configuration's own
//! top-level keys. Substitution is "safe" — a placeholder nobody can resolve
//! stays in the output verbatim — and the substitute-then-expand-home cycle
//! repeats until it stops changing or hits a fixed pass cap. Hitting the cap
//! simply returns the last value, so cyclic templates like `a: $b` / `b: $a`
//! cost ten passes instead of a hang, at the price of an unexpanded result.

use regex_lite::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

/// Upper bound on substitute-then-expand passes for a single value.
pub const MAX_EXPANSION_PASSES: usize = 10;

/// `$name` or `${name}`.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:([A-Za-z_][A-Za-z0-9_]*)|\{([^}]*)\})")
        .expect("placeholder pattern is valid")
});

/// A flattened variable namespace built from ordered layers.
///
/// Layers are applied lowest-precedence first; a later layer overwrites
/// earlier entries on key collision.
#[derive(Debug, Default, Clone)]
pub struct Namespace {
    values: HashMap<String, String>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a layer on top of the namespace built so far.
    pub fn layer<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in entries {
            self.values.insert(key.into(), value.into());
        }
        self
    }

    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Render a value for use as a substitution source.
///
/// Only scalars are addressable from a template; mappings and sequences
/// (and null) yield `None` and leave their placeholders literal.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(num) => Some(num.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// One safe-substitution pass over `template`.
pub fn substitute(template: &str, namespace: &Namespace) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            match namespace.resolve(name) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(value: &str) -> String {
    expand_home_with(value, dirs::home_dir().as_deref())
}

pub(crate) fn expand_home_with(value: &str, home: Option<&Path>) -> String {
    let Some(home) = home else {
        return value.to_string();
    };
    if value == "~" {
        home.to_string_lossy().into_owned()
    } else if let Some(rest) = value.strip_prefix("~/") {
        home.join(rest).to_string_lossy().into_owned()
    } else {
        value.to_string()
    }
}

/// Expand `template` to a fixed point, bounded by [`MAX_EXPANSION_PASSES`].
pub fn expand(template: &str, namespace: &Namespace) -> String {
    expand_with_home(template, namespace, dirs::home_dir().as_deref())
}

pub(crate) fn expand_with_home(
    template: &str,
    namespace: &Namespace,
    home: Option<&Path>,
) -> String {
    let mut current = template.to_string();
    for _ in 0..MAX_EXPANSION_PASSES {
        let next = expand_home_with(&substitute(&current, namespace), home);
        if next == current {
            break;
        }
        current = next;
    }
    current
}
