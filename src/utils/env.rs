//! Environment variable utilities
//!
//! Unset and blank variables are treated the same.

/// Get a non-blank environment variable
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable parsed as `T`
///
/// Returns `None` if unset, blank, or unparseable.
pub fn env_int<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env_opt(key)?.trim().parse().ok()
}

/// Whether an environment variable is set at all (e.g. `NO_COLOR`)
pub fn env_present(key: &str) -> bool {
    std::env::var_os(key).is_some()
}
