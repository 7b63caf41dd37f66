//! Helpers for reading service configuration from environment variables.

use std::fmt::Display;
use std::str::FromStr;

use anyhow::{Context as _, anyhow};

/// Read a required env var. Empty values count as missing.
pub fn require(key: &str) -> anyhow::Result<String> {
    require_value(key, std::env::var(key).ok())
}

/// Read an optional env var. Empty values count as unset.
pub fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Read and parse an env var, falling back to `default` when unset.
///
/// A value that is set but does not parse is an error rather than a silent
/// fallback, so a typo in deployment config fails at startup.
pub fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    parse_value(key, std::env::var(key).ok(), default)
}

fn require_value(key: &str, raw: Option<String>) -> anyhow::Result<String> {
    raw.filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow!("missing required env var {key}"))
}

fn parse_value<T>(key: &str, raw: Option<String>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match raw.filter(|v| !v.trim().is_empty()) {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|e: T::Err| anyhow!("{e}"))
            .with_context(|| format!("invalid value for env var {key}: {v:?}")),
    }
}
