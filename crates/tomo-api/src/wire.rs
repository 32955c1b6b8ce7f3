//! Helpers shared by the wire-to-domain mappings.

use chrono::{DateTime, NaiveDateTime, Utc};

use tomo_core::error::{Result, TomoError};

/// Parses a server timestamp.
///
/// The service emits naive UTC datetimes (no offset); proxies and future
/// versions may emit RFC 3339. Anything else is a hard decode error.
pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    Err(TomoError::decode(format!("unparseable timestamp '{value}'")))
}
