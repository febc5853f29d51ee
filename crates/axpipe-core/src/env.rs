//! Environment variable utilities.
//!
//! All host tunables (`AXP_*`) go through these helpers so parse failures
//! fall back to the compiled-in default instead of aborting startup.

use std::str::FromStr;

/// Parse an environment variable as `T`, falling back to `default` when
/// the variable is unset or unparsable.
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Boolean environment variable. "1", "true", "yes", "on" (any case) count
/// as true; anything else, including unset, yields the default.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_get_default_on_unset() {
        let v: u64 = env_get("AXP_TEST_UNSET_VAR_XYZ", 42);
        assert_eq!(v, 42);
    }

    #[test]
    fn test_env_get_parses() {
        std::env::set_var("AXP_TEST_PARSE_VAR", "17");
        let v: usize = env_get("AXP_TEST_PARSE_VAR", 1);
        assert_eq!(v, 17);
        std::env::remove_var("AXP_TEST_PARSE_VAR");
    }
}
