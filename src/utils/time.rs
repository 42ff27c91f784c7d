//! Timestamp parsing and rounding helpers shared by the pipelines.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Parse an API timestamp into UTC.
///
/// Accepts RFC 3339, Kimai's `+0200` style offsets, and naive ISO
/// date-times (taken as UTC).
pub fn parse_utc(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let offset_formats = ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%z"];
    for fmt in offset_formats {
        if let Ok(dt) = DateTime::<FixedOffset>::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    parse_naive(s).map(|dt| Utc.from_utc_datetime(&dt))
}

/// Parse a timestamp and convert it to the reporting zone.
pub fn parse_local(s: &str, tz: Tz) -> Option<DateTime<Tz>> {
    parse_utc(s).map(|dt| dt.with_timezone(&tz))
}

/// Parse a date or date-time, discarding any offset (wall-clock value kept).
pub fn parse_wall_clock(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::<FixedOffset>::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.naive_local());
    }
    parse_naive(s)
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    s.get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn us_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_kimai_offsets_without_colon() {
        let dt = parse_utc("2026-02-03T10:15:00-0500").unwrap();
        assert_eq!(dt.hour(), 15);
        assert_eq!(dt.minute(), 15);
    }

    #[test]
    fn parses_rfc3339_and_naive() {
        assert_eq!(parse_utc("2026-02-03T10:15:00+01:00").unwrap().hour(), 9);
        assert_eq!(parse_utc("2026-02-03T10:15:00").unwrap().hour(), 10);
        assert!(parse_utc("not a date").is_none());
        assert!(parse_utc("").is_none());
    }

    #[test]
    fn local_conversion_uses_zone() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let local = parse_local("2026-07-01T16:00:00Z", tz).unwrap();
        assert_eq!(local.hour(), 12);
    }

    #[test]
    fn wall_clock_drops_offset() {
        let dt = parse_wall_clock("2026-03-01T08:30:00-05:00").unwrap();
        assert_eq!(dt.hour(), 8);
        let d = parse_wall_clock("2026-03-01").unwrap();
        assert_eq!(d.hour(), 0);
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(2.345678, 2), 2.35);
        assert_eq!(round_to(12.25, 1), 12.3);
    }
}
