//! # Check Intervals: Textual Durations
//!
//! `check_every` on resources and resource types is written as text: either
//! the keyword `never`, or a duration built from `<integer><unit>` segments
//! such as `30s`, `10m`, `1h30m` or `250ms`.
//!
//! [`CheckEvery`] derives `JsonSchema` from its struct shape, which is NOT
//! what appears in a configuration file. The schema crate overrides the
//! reflected definition's type to `string` for that reason.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ModelError;

const NEVER: &str = "never";

/// How often a resource is checked for new versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, JsonSchema)]
pub struct CheckEvery {
    /// Checking is disabled entirely.
    pub never: bool,
    /// Interval between checks. Zero when `never` is set.
    pub interval: Duration,
}

impl CheckEvery {
    /// A check interval that disables checking.
    pub fn never() -> Self {
        Self {
            never: true,
            interval: Duration::ZERO,
        }
    }

    /// A check interval of the given duration, truncated to whole
    /// milliseconds, the finest unit the textual form can express.
    pub fn every(interval: Duration) -> Self {
        Self {
            never: false,
            interval: truncate_to_millis(interval),
        }
    }
}

impl FromStr for CheckEvery {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == NEVER {
            return Ok(Self::never());
        }
        parse_duration(s).map(Self::every)
    }
}

impl fmt::Display for CheckEvery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.never {
            f.write_str(NEVER)
        } else {
            f.write_str(&format_duration(self.interval))
        }
    }
}

impl Serialize for CheckEvery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CheckEvery {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a duration made of `<integer><unit>` segments.
///
/// Units: `h`, `m`, `s`, `ms`. Segments may repeat and appear in any order;
/// their values are summed. The empty string and bare numbers other than
/// `0` are rejected.
pub fn parse_duration(input: &str) -> Result<Duration, ModelError> {
    let invalid = |reason: &str| ModelError::InvalidDuration {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    if input.is_empty() {
        return Err(invalid("empty duration"));
    }
    if input == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total = Duration::ZERO;
    let mut rest = input;
    while !rest.is_empty() {
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return Err(invalid("expected a number"));
        }
        let value: u64 = rest[..digits]
            .parse()
            .map_err(|_| invalid("number out of range"))?;
        rest = &rest[digits..];

        let unit_len = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()).len();
        let segment = match &rest[..unit_len] {
            "h" => value.checked_mul(3600).map(Duration::from_secs),
            "m" => value.checked_mul(60).map(Duration::from_secs),
            "s" => Some(Duration::from_secs(value)),
            "ms" => Some(Duration::from_millis(value)),
            "" => return Err(invalid("missing unit")),
            _ => return Err(invalid("unknown unit")),
        }
        .ok_or_else(|| invalid("number out of range"))?;
        rest = &rest[unit_len..];

        total = total
            .checked_add(segment)
            .ok_or_else(|| invalid("number out of range"))?;
    }
    Ok(total)
}

fn truncate_to_millis(duration: Duration) -> Duration {
    Duration::new(duration.as_secs(), duration.subsec_millis() * 1_000_000)
}

/// Format a duration in the canonical segment form accepted by
/// [`parse_duration`], largest unit first (`1h30m`, `45s`, `1s500ms`).
///
/// Sub-millisecond parts are dropped; a duration shorter than 1ms formats
/// as `0s`.
pub fn format_duration(duration: Duration) -> String {
    if truncate_to_millis(duration).is_zero() {
        return "0s".to_string();
    }

    let secs = duration.as_secs();
    let millis = duration.subsec_millis();
    let mut out = String::new();
    for (amount, unit) in [
        (secs / 3600, "h"),
        ((secs % 3600) / 60, "m"),
        (secs % 60, "s"),
        (u64::from(millis), "ms"),
    ] {
        if amount > 0 {
            out.push_str(&amount.to_string());
            out.push_str(unit);
        }
    }
    out
}
