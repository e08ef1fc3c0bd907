//! Environment variable utilities
//!
//! Used by the logging macros and by `OrdinatorConfig::from_env`.
//!
//! ```ignore
//! use ordinator_core::env::{env_get, env_get_bool};
//!
//! let stack: usize = env_get("ORD_STACK_SIZE", 1024 * 1024);
//! let debug = env_get_bool("ORD_DEBUG", false);
//! ```

use std::str::FromStr;

/// Get environment variable parsed as type T, or return default
///
/// Unset variables and values that fail to parse both yield `default`.
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Get environment variable as boolean
///
/// Accepts "1", "true", "yes", "on" (case-insensitive) as true.
/// Any other value is false; unset returns the default.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => parse_bool(&val),
        Err(_) => default,
    }
}

/// Shared truthiness rule for flag-like variables
#[inline]
pub fn parse_bool(val: &str) -> bool {
    matches!(
        val.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_get_default() {
        let val: usize = env_get("__ORD_TEST_UNSET_VAR__", 42);
        assert_eq!(val, 42);
    }

    #[test]
    fn test_env_get_with_set_var() {
        std::env::set_var("__ORD_TEST_NUM__", " 123 ");
        let val: usize = env_get("__ORD_TEST_NUM__", 0);
        assert_eq!(val, 123);
        std::env::remove_var("__ORD_TEST_NUM__");
    }

    #[test]
    fn test_env_get_invalid_parse() {
        std::env::set_var("__ORD_TEST_INVALID__", "lots");
        let val: usize = env_get("__ORD_TEST_INVALID__", 99);
        assert_eq!(val, 99);
        std::env::remove_var("__ORD_TEST_INVALID__");
    }

    #[test]
    fn test_env_get_bool() {
        assert!(env_get_bool("__ORD_TEST_UNSET_BOOL__", true));
        assert!(!env_get_bool("__ORD_TEST_UNSET_BOOL__", false));

        std::env::set_var("__ORD_TEST_BOOL__", "ON");
        assert!(env_get_bool("__ORD_TEST_BOOL__", false));
        std::env::set_var("__ORD_TEST_BOOL__", "garbage");
        assert!(!env_get_bool("__ORD_TEST_BOOL__", true));
        std::env::remove_var("__ORD_TEST_BOOL__");
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("yes"));
        assert!(parse_bool("1"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("off"));
    }
}
