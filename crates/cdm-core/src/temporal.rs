//! # Temporal Helpers — ISO-8601 Timestamps
//!
//! Two levels of strictness are used by the gate:
//!
//! - [`parse_iso8601`] is lenient. Any RFC 3339 string with an offset is
//!   accepted and converted to UTC; a date-time without an offset is taken
//!   as UTC. Metadata `processedAt` uses this.
//! - [`is_canonical_iso8601`] is strict. The string must be exactly what
//!   [`to_canonical_iso8601`] would print for the same instant:
//!   `YYYY-MM-DDTHH:MM:SS.sssZ`. Contact `createdAt`/`modifiedAt` use this.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::error::CdmError;

/// Offset-less ISO-8601 date-time, with optional fractional seconds.
const NAIVE_ISO8601: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parse an ISO-8601 timestamp, accepting any offset. A timestamp without
/// an offset is interpreted as UTC.
///
/// # Errors
///
/// Returns [`CdmError::InvalidTimestamp`] if the string does not parse.
pub fn parse_iso8601(s: &str) -> Result<DateTime<Utc>, CdmError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, NAIVE_ISO8601)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| CdmError::InvalidTimestamp(s.to_string()))
}

/// Render a UTC instant with millisecond precision and a `Z` suffix.
pub fn to_canonical_iso8601(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Returns `true` if `s` parses and re-renders to exactly the same string.
pub fn is_canonical_iso8601(s: &str) -> bool {
    match parse_iso8601(s) {
        Ok(dt) => to_canonical_iso8601(&dt) == s,
        Err(_) => false,
    }
}

/// Current time rendered in canonical form.
pub fn now_iso8601() -> String {
    to_canonical_iso8601(&Utc::now())
}
