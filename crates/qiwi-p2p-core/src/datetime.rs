//! Timestamp codecs.
//!
//! Bill metadata fields (`creationDateTime`, `expirationDateTime`,
//! `status.changedDateTime`) use RFC 3339 with optional fractional seconds and
//! an explicit `±hh:mm` offset. The hosted form's `lifetime` parameter uses
//! [`LIFETIME_FORMAT`], a wall clock read in Moscow time.

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, TimeZone};
use std::fmt::Display;

use crate::error::DateTimeError;

/// `chrono` format string of the hosted-form `lifetime` parameter.
pub const LIFETIME_FORMAT: &str = "%Y-%m-%dT%H%M%S";

/// Moscow offset from UTC in seconds.
const MOSCOW_OFFSET_SECONDS: i32 = 3 * 3600;

/// The fixed UTC+3 offset lifetime values are expressed in.
#[must_use]
pub fn moscow_offset() -> FixedOffset {
    FixedOffset::east_opt(MOSCOW_OFFSET_SECONDS).expect("UTC+3 is a valid offset")
}

/// Format a timestamp for a bill metadata field.
///
/// The offset is always written numerically, `Z` is never emitted. Fractional
/// seconds are written only when non-zero.
#[must_use]
pub fn format_datetime<Tz>(t: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    t.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Parse a bill metadata timestamp.
///
/// # Errors
///
/// Returns [`DateTimeError::Metadata`] if `input` is not RFC 3339.
pub fn parse_datetime(input: &str) -> Result<DateTime<FixedOffset>, DateTimeError> {
    DateTime::parse_from_rfc3339(input).map_err(|source| DateTimeError::Metadata {
        input: input.to_string(),
        source,
    })
}

/// Format a timestamp as a hosted-form `lifetime` value.
///
/// The instant is converted to UTC+3 first, sub-second precision is dropped.
#[must_use]
pub fn format_lifetime<Tz: TimeZone>(t: &DateTime<Tz>) -> String {
    t.with_timezone(&moscow_offset())
        .format(LIFETIME_FORMAT)
        .to_string()
}

/// Parse a hosted-form `lifetime` value as a UTC+3 wall clock.
///
/// # Errors
///
/// Returns [`DateTimeError::Lifetime`] if `input` does not match
/// [`LIFETIME_FORMAT`].
pub fn parse_lifetime(input: &str) -> Result<DateTime<FixedOffset>, DateTimeError> {
    let naive = NaiveDateTime::parse_from_str(input, LIFETIME_FORMAT).map_err(|source| {
        DateTimeError::Lifetime {
            input: input.to_string(),
            source,
        }
    })?;

    moscow_offset()
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| DateTimeError::LifetimeOutOfRange {
            input: input.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Utc};

    #[test]
    fn metadata_round_trip_keeps_instant() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 15).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);

        let parsed = parse_datetime(&format_datetime(&t)).unwrap();
        assert_eq!(parsed, t);
    }

    #[test]
    fn metadata_format_uses_numeric_offset() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 15).unwrap();
        assert_eq!(format_datetime(&t), "2024-03-01T09:30:15+00:00");

        let msk = t.with_timezone(&moscow_offset());
        assert_eq!(format_datetime(&msk), "2024-03-01T12:30:15+03:00");
    }

    #[test]
    fn metadata_parse_accepts_vendor_samples() {
        let parsed = parse_datetime("2021-03-25T12:51:23.155+03:00").unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), MOSCOW_OFFSET_SECONDS);
        assert_eq!(parsed.nanosecond(), 155_000_000);

        assert!(parse_datetime("2021-03-25T12:51:23Z").is_ok());
    }

    #[test]
    fn metadata_parse_rejects_garbage() {
        let err = parse_datetime("25.03.2021 12:51").unwrap_err();
        assert!(matches!(err, DateTimeError::Metadata { .. }));
        assert!(err.to_string().contains("25.03.2021 12:51"));
    }

    #[test]
    fn lifetime_format_is_moscow_wall_clock() {
        let t = Utc.with_ymd_and_hms(2024, 12, 31, 21, 5, 9).unwrap();
        assert_eq!(format_lifetime(&t), "2025-01-01T000509");
    }

    #[test]
    fn lifetime_round_trip_keeps_instant() {
        let t = Utc.with_ymd_and_hms(2024, 6, 15, 8, 0, 30).unwrap();
        let parsed = parse_lifetime(&format_lifetime(&t)).unwrap();
        assert_eq!(parsed, t);
        assert_eq!(parsed.offset(), &moscow_offset());
    }

    #[test]
    fn lifetime_drops_subseconds() {
        let t = Utc.with_ymd_and_hms(2024, 6, 15, 8, 0, 30).unwrap()
            + chrono::Duration::milliseconds(750);
        let parsed = parse_lifetime(&format_lifetime(&t)).unwrap();
        assert_eq!(parsed.timestamp(), t.timestamp());
    }

    #[test]
    fn lifetime_parse_rejects_metadata_format() {
        let err = parse_lifetime("2024-06-15T11:00:30+03:00").unwrap_err();
        assert!(matches!(err, DateTimeError::Lifetime { .. }));
    }
}
