//! Serde helpers for note timestamps.
//!
//! Timestamps are written as RFC 3339. On read, naive ISO-8601 values with no
//! UTC offset (for example `2024-05-01T09:30:00.123456`) are also accepted and
//! interpreted as UTC.

use serde::{Deserialize, Deserializer, Serializer, de};
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{OffsetDateTime, PrimitiveDateTime};

/// Current time in the local offset, or UTC when the offset is unknown.
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Parses a timestamp string, accepting RFC 3339 or naive ISO-8601.
pub fn parse(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    match OffsetDateTime::parse(value, &Rfc3339) {
        Ok(ts) => Ok(ts),
        Err(_) => PrimitiveDateTime::parse(value, &Iso8601::DEFAULT).map(|ts| ts.assume_utc()),
    }
}

/// Formats a timestamp as RFC 3339.
pub fn format(value: &OffsetDateTime) -> String {
    value
        .format(&Rfc3339)
        .unwrap_or_else(|_| value.unix_timestamp().to_string())
}

pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let formatted = value.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&formatted)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(|e| de::Error::custom(format!("invalid timestamp `{raw}`: {e}")))
}
