//! Environment variable readers with literal evaluation.
//!
//! Configuration values frequently arrive through the environment as strings
//! (`PYFARM_AGENT_PORT=9091`, `PYFARM_AGENT_DEBUG=yes`). The readers here
//! look the variable up, evaluate it as a literal where requested, and check
//! the resulting type instead of silently coercing.

use crate::error::{ConfigError, ConfigResult};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Lowercased values accepted as `true` by [`read_env_bool`].
pub static BOOLEAN_TRUE: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| HashSet::from(["1", "t", "y", "true", "yes"]));

/// Lowercased values accepted as `false` by [`read_env_bool`].
pub static BOOLEAN_FALSE: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| HashSet::from(["0", "f", "n", "false", "no"]));

/// Look up an environment variable, failing when it is unset.
pub fn read_env(var: &str) -> ConfigResult<String> {
    debug!("read_env(${var})");
    std::env::var(var).map_err(|_| ConfigError::missing_env(var))
}

/// Look up an environment variable, returning `default` when it is unset.
pub fn read_env_or(var: &str, default: impl Into<String>) -> String {
    match std::env::var(var) {
        Ok(value) => value,
        Err(_) => default.into(),
    }
}

/// Evaluate a string as a literal value.
///
/// Recognizes booleans (`true` / `True`), null (`None` / `null`), integers,
/// and floats. Anything else is not a literal.
pub fn eval_literal(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    match trimmed {
        "true" | "True" => return Some(Value::Bool(true)),
        "false" | "False" => return Some(Value::Bool(false)),
        "None" | "none" | "null" | "Null" => return Some(Value::Null),
        _ => {}
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(Value::from(int));
    }
    if let Ok(float) = trimmed.parse::<f64>()
        && float.is_finite()
    {
        return Some(Value::from(float));
    }
    None
}

/// Look up an environment variable and evaluate it as a literal.
pub fn read_env_eval(var: &str) -> ConfigResult<Value> {
    let raw = read_env(var)?;
    eval_literal(&raw).ok_or_else(|| ConfigError::invalid_literal(var, raw))
}

/// Like [`read_env_eval`], but evaluation failures fall back to `default`.
///
/// The failure is logged, not raised. An unset variable also yields the
/// default.
pub fn read_env_eval_or(var: &str, default: Value) -> Value {
    let Ok(raw) = std::env::var(var) else {
        return default;
    };
    match eval_literal(&raw) {
        Some(value) => value,
        None => {
            warn!("${var} contains {raw:?}, which is not a literal; using the default");
            default
        }
    }
}

/// Read a boolean from the environment.
///
/// Accepts the usual spellings in either case (`1`/`t`/`y`/`true`/`yes` and
/// `0`/`f`/`n`/`false`/`no`). Any other value is a type error, never a guess.
pub fn read_env_bool(var: &str, default: bool) -> ConfigResult<bool> {
    let raw = match std::env::var(var) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    let lowered = raw.to_lowercase();
    if BOOLEAN_TRUE.contains(lowered.as_str()) {
        Ok(true)
    } else if BOOLEAN_FALSE.contains(lowered.as_str()) {
        Ok(false)
    } else {
        Err(ConfigError::type_mismatch(var, "boolean", raw))
    }
}

/// Read a numeric literal from the environment.
///
/// Integers and floats are returned as numbers; booleans evaluate as literals
/// and pass through. A literal of any other type is a type error, and a value
/// that is not a literal at all is an evaluation error.
pub fn read_env_number(var: &str) -> ConfigResult<Value> {
    let value = read_env_eval(var)?;
    match value {
        Value::Number(_) | Value::Bool(_) => Ok(value),
        other => Err(ConfigError::type_mismatch(var, "number", other)),
    }
}

/// Read an integer from the environment. Floats and booleans do not qualify.
pub fn read_env_int(var: &str) -> ConfigResult<i64> {
    match read_env_eval(var)? {
        Value::Number(num) if num.is_i64() => Ok(num.as_i64().unwrap_or_default()),
        other => Err(ConfigError::type_mismatch(var, "integer", other)),
    }
}

/// Read a float from the environment. Integer literals do not qualify.
pub fn read_env_float(var: &str) -> ConfigResult<f64> {
    match read_env_eval(var)? {
        Value::Number(num) if !num.is_i64() && !num.is_u64() => {
            Ok(num.as_f64().unwrap_or_default())
        }
        other => Err(ConfigError::type_mismatch(var, "float", other)),
    }
}
