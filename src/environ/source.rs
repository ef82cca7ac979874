//! Process environment access.
//!
//! Everything that reads environment variables lives here, so the decision
//! logic in [`BuildEnviron`](super::BuildEnviron) stays free of global state.
//! Each reader has a `*_with`/`*_lookup` twin that takes a lookup function
//! for testing.

use std::env::VarError;

/// Interpret an environment value as a boolean.
///
/// Empty, `"0"` and (case-insensitively) `"false"` are false. Every other
/// value is true.
///
/// # Example
///
/// ```
/// use cibuild::environ::parse_bool;
///
/// assert!(parse_bool("1"));
/// assert!(parse_bool("yes"));
/// assert!(!parse_bool("FALSE"));
/// assert!(!parse_bool(""));
/// ```
pub fn parse_bool(value: &str) -> bool {
    !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
}

/// Lookup function backed by the process environment.
pub fn process_env(name: &str) -> Result<String, VarError> {
    std::env::var(name)
}

/// Read a boolean flag from the process environment.
///
/// Absent variables are false; this never fails.
pub fn bool_from_env(name: &str) -> bool {
    bool_from_lookup(name, process_env)
}

/// Read a boolean flag through a custom lookup (for testing).
pub fn bool_from_lookup<F>(name: &str, env_fn: F) -> bool
where
    F: Fn(&str) -> Result<String, VarError>,
{
    env_fn(name).map(|v| parse_bool(&v)).unwrap_or(false)
}

/// Read a string variable through a custom lookup, empty when absent.
pub(crate) fn string_from_lookup<F>(name: &str, env_fn: &F) -> String
where
    F: Fn(&str) -> Result<String, VarError>,
{
    env_fn(name).unwrap_or_default()
}
