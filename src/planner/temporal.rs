//! Temporal literal parsing and calendar-day normalization
//!
//! A date-only literal (`2024-03-01`) compared against a temporal field means
//! the whole calendar day, i.e. the half-open interval
//! `[midnight(date), midnight(date + 1 day))`.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime};

/// A parsed temporal literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalLiteral {
    /// Calendar date without a time component
    Date(NaiveDate),
    /// Exact timestamp
    DateTime(NaiveDateTime),
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

impl TemporalLiteral {
    /// Parses a date, a naive timestamp, or an RFC 3339 timestamp
    /// (converted to UTC wall time).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Some(TemporalLiteral::Date(date));
        }

        for format in DATETIME_FORMATS {
            if let Ok(ts) = NaiveDateTime::parse_from_str(s, format) {
                return Some(TemporalLiteral::DateTime(ts));
            }
        }

        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|ts| TemporalLiteral::DateTime(ts.naive_utc()))
    }

    /// Timestamp this literal denotes; dates map to their midnight
    pub fn to_timestamp(self) -> NaiveDateTime {
        match self {
            TemporalLiteral::Date(date) => start_of_day(date),
            TemporalLiteral::DateTime(ts) => ts,
        }
    }
}

/// Parses any accepted temporal text into a timestamp
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    TemporalLiteral::parse(s).map(TemporalLiteral::to_timestamp)
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// `[midnight(date), midnight(date + 1))`, or `None` at the end of the calendar
pub fn day_bounds(date: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let next = date.checked_add_days(Days::new(1))?;
    Some((start_of_day(date), start_of_day(next)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_parse_date_only() {
        let parsed = TemporalLiteral::parse("2024-03-01").unwrap();
        assert_eq!(
            parsed,
            TemporalLiteral::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
        assert_eq!(parsed.to_timestamp(), ts("2024-03-01 00:00:00"));
    }

    #[test]
    fn test_parse_datetimes() {
        assert_eq!(
            parse_timestamp("2024-03-01T12:30:00"),
            Some(ts("2024-03-01 12:30:00"))
        );
        assert_eq!(
            parse_timestamp("2024-03-01 12:30:00"),
            Some(ts("2024-03-01 12:30:00"))
        );
        assert_eq!(
            parse_timestamp("2024-03-01T12:30:00+02:00"),
            Some(ts("2024-03-01 10:30:00"))
        );
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-01"), None);
    }

    #[test]
    fn test_day_bounds_cross_month() {
        let (start, end) = day_bounds(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()).unwrap();
        assert_eq!(start, ts("2024-02-29 00:00:00"));
        assert_eq!(end, ts("2024-03-01 00:00:00"));
    }

    #[test]
    fn test_day_bounds_at_calendar_end() {
        assert!(day_bounds(NaiveDate::MAX).is_none());
    }
}
