//! Detection, parsing and formatting of ISO-8601 timestamps on the wire.
//!
//! # Accepted shape
//! `YYYY-MM-DDTHH:MM:SS`, then an optional fractional part (`.` and one or
//! more digits), then an optional zone: `Z` or `+HH:MM` / `-HH:MM`. The whole
//! string must match; a timestamp embedded in longer text is left alone. A
//! missing zone is read as UTC.
//!
//! Generated clients for this protocol disagree on whether the fraction and
//! the zone are mandatory. Decoding accepts the union of those forms.
//!
//! Only ASCII digits count.
//!
//! A string that has the right shape but names an impossible instant
//! (`2024-19-01T00:00:00Z`) is not a timestamp and stays a string.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, Utc};
use regex::Regex;

static ISO8601: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[0-9]{4}-[01][0-9]-[0-3][0-9]T[0-2][0-9]:[0-5][0-9]:[0-5][0-9](\.[0-9]+)?(Z|[+-][0-2][0-9]:[0-5][0-9])?$",
    )
    .expect("timestamp pattern is valid")
});

/// Whether `s` has the shape of a wire timestamp.
///
/// This is the cheap shape check only; use [`parse_timestamp`] to also
/// validate the calendar fields.
pub fn is_timestamp(s: &str) -> bool {
    ISO8601.is_match(s)
}

/// Parse a wire timestamp, returning `None` when `s` is not one.
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    let caps = ISO8601.captures(s)?;
    if caps.get(2).is_some() {
        DateTime::parse_from_rfc3339(s).ok()
    } else {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    }
}

/// Render an instant the way the wire expects it: millisecond precision, `Z`
/// for UTC, `+HH:MM` otherwise.
pub fn format_timestamp<Tz>(dt: &DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// serde adapter for optional UTC timestamp fields on typed structs.
///
/// Serializes with [`format_timestamp`] and accepts anything
/// [`parse_timestamp`] accepts.
pub mod option {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&format_timestamp(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) => parse_timestamp(&s)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ACCEPTED: &[&str] = &[
        "2024-01-02T03:04:05.000Z",
        "2024-01-02T03:04:05Z",
        "2024-01-02T03:04:05.123456789Z",
        "2024-01-02T03:04:05+02:00",
        "2024-01-02T03:04:05.5-07:30",
        "2024-01-02T03:04:05",
        "2024-01-02T03:04:05.250",
    ];

    const REJECTED: &[&str] = &[
        "",
        "2024-01-02",
        "2024-01-02T03:04Z",
        "2024-01-02 03:04:05Z",
        "2024-01-02T03:04:05.Z",
        "2024-01-02T03:04:05+0200",
        "2024-01-02T03:04:05z",
        "created 2024-01-02T03:04:05Z",
        "2024-01-02T03:04:05Z trailing",
        "24-01-02T03:04:05Z",
        "milk",
        "\u{662}\u{660}\u{662}\u{664}-\u{660}\u{661}-\u{660}\u{662}T\u{660}\u{663}:\u{660}\u{664}:\u{660}\u{665}Z",
    ];

    #[test]
    fn accepted_table() {
        for s in ACCEPTED {
            assert!(is_timestamp(s), "{s} should match");
            assert!(parse_timestamp(s).is_some(), "{s} should parse");
        }
    }

    #[test]
    fn rejected_table() {
        for s in REJECTED {
            assert!(!is_timestamp(s), "{s} should not match");
            assert!(parse_timestamp(s).is_none(), "{s} should not parse");
        }
    }

    #[test]
    fn shaped_but_impossible_dates_are_not_timestamps() {
        for s in ["2024-19-01T00:00:00Z", "2024-02-31T00:00:00Z", "2024-01-02T29:00:00Z"] {
            assert!(parse_timestamp(s).is_none(), "{s}");
        }
    }

    #[test]
    fn missing_zone_is_utc() {
        let dt = parse_timestamp("2024-01-02T03:04:05").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 0);
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
    }

    #[test]
    fn offset_is_preserved() {
        let dt = parse_timestamp("2024-01-02T03:04:05+02:00").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 2, 1, 4, 5).unwrap());
    }

    #[test]
    fn format_uses_millis_and_z() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(format_timestamp(&dt), "2024-01-02T03:04:05.000Z");
    }

    #[test]
    fn format_keeps_explicit_offset() {
        let dt = parse_timestamp("2024-01-02T03:04:05.120+02:00").unwrap();
        assert_eq!(format_timestamp(&dt), "2024-01-02T03:04:05.120+02:00");
    }
}
