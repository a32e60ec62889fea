//! # Timestamp Utilities
//!
//! Every timestamp in a summary is expressed in one fixed reference zone,
//! US Mountain Time, whatever offset the source file annotates it with.
//! Daylight-saving transitions follow the `America/Denver` rules from the
//! IANA database.
//!
//! ```rust
//! use tcx_summary::time_utils::{format_long, parse_date};
//!
//! let ts = parse_date("2018-04-20T00:50:43.000Z").unwrap();
//! assert_eq!(format_long(&ts), "April 19, 2018 6:50 PM");
//! ```

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use serde::Serializer;

use crate::error::{Result, SummaryError};

/// Zone all parsed timestamps are converted to.
pub const REFERENCE_ZONE: Tz = chrono_tz::America::Denver;

/// A point in time rendered in [`REFERENCE_ZONE`].
pub type Timestamp = DateTime<Tz>;

/// Parse an ISO-8601 timestamp and convert it to [`REFERENCE_ZONE`].
///
/// RFC 3339 input (`Z` or a numeric offset) is converted from its own offset.
/// A timestamp without any offset is read as UTC. Unreadable text is an
/// error rather than a stand-in time, and the required `Id`, `@StartTime`
/// and `Time` paths fail the document before this is reached when absent.
pub fn parse_date(raw: &str) -> Result<Timestamp> {
    let trimmed = raw.trim();
    let utc = match DateTime::parse_from_rfc3339(trimmed) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(err) => match NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
            Ok(naive) => naive.and_utc(),
            Err(_) => {
                return Err(SummaryError::InvalidTimestamp {
                    raw: raw.to_string(),
                    source: err,
                })
            }
        },
    };
    Ok(utc.with_timezone(&REFERENCE_ZONE))
}

/// Long localized form, e.g. `April 19, 2018 6:50 PM`.
pub fn format_long(ts: &Timestamp) -> String {
    ts.format("%B %-d, %Y %-I:%M %p").to_string()
}

/// Serialize as RFC 3339 with milliseconds and the zone's numeric offset,
/// e.g. `2018-04-19T18:50:43.000-06:00`.
pub fn serialize_timestamp<S>(ts: &Timestamp, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, false))
}
