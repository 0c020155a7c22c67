//! Configuration helpers
//!
//! Environment lookups and Go-style duration strings (`"15m"`, `"168h"`,
//! `"1h30m"`, `"250ms"`). Per-crate config structs build on these.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    #[error("empty duration")]
    Empty,

    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),

    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },

    #[error("invalid number in duration {0:?}")]
    InvalidNumber(String),
}

/// Parse a duration such as `"15m"`, `"1h30m"` or `"500ms"`.
///
/// Units: `ms`, `s`, `m`, `h`. A bare `"0"` is accepted.
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(DurationParseError::Empty);
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total = Duration::ZERO;
    let mut rest = s;
    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| DurationParseError::MissingUnit(input.to_string()))?;
        if digits == 0 {
            return Err(DurationParseError::InvalidNumber(input.to_string()));
        }
        let value: u64 = rest[..digits]
            .parse()
            .map_err(|_| DurationParseError::InvalidNumber(input.to_string()))?;
        rest = &rest[digits..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];

        total += match unit {
            "ms" => Duration::from_millis(value),
            "s" => Duration::from_secs(value),
            "m" => Duration::from_secs(value * 60),
            "h" => Duration::from_secs(value * 3600),
            other => {
                return Err(DurationParseError::UnknownUnit {
                    unit: other.to_string(),
                    input: input.to_string(),
                });
            }
        };
    }
    Ok(total)
}

/// Non-empty value of `key`, if set.
pub fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Value of `key` or `default` when unset or empty.
pub fn env_or(key: &str, default: &str) -> String {
    env_var(key).unwrap_or_else(|| default.to_string())
}

/// Value of `key`, failing when unset or empty.
pub fn require_env(key: &'static str) -> Result<String, ConfigError> {
    env_var(key).ok_or(ConfigError::Missing(key))
}

/// Duration from `key`. Unparsable values fall back to `default` with a warning.
pub fn env_duration(key: &str, default: Duration) -> Duration {
    match env_var(key) {
        Some(raw) => parse_duration(&raw).unwrap_or_else(|e| {
            tracing::warn!(key, value = %raw, error = %e, "Invalid duration, using default");
            default
        }),
        None => default,
    }
}

/// Parsed value from `key`, or `default` when unset.
pub fn env_parse<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env_var(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
