//! Inclusive `from`/`to` bounds used by order listing and analytics.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::shared::error::{AppError, FieldError};

const INVALID_BOUND: &str = "Enter a valid date (YYYY-MM-DD) or RFC 3339 datetime.";

/// A time window with inclusive bounds on both ends.
///
/// Internally the upper bound is kept as an exclusive instant (`until`) so
/// queries can use `order_date < until`. A date-only `to` covers that whole
/// UTC day; a datetime `to` includes that exact instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    raw_from: Option<String>,
    raw_to: Option<String>,
}

/// The bounds as the client sent them, echoed back in analytics responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRangeEcho {
    pub from: Option<String>,
    pub to: Option<String>,
}

enum Bound {
    Day(NaiveDate),
    Instant(DateTime<Utc>),
}

fn parse_bound(raw: &str) -> Option<Bound> {
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Bound::Day(day));
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| Bound::Instant(dt.with_timezone(&Utc)))
}

fn start_of(day: NaiveDate) -> DateTime<Utc> {
    day.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
}

impl DateRange {
    /// Parse optional `from`/`to` query values. Empty strings count as absent.
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self, AppError> {
        let raw_from = from.map(str::trim).filter(|s| !s.is_empty());
        let raw_to = to.map(str::trim).filter(|s| !s.is_empty());

        let mut errors = Vec::new();

        let start = match raw_from.map(parse_bound) {
            None => None,
            Some(Some(Bound::Day(day))) => Some(start_of(day)),
            Some(Some(Bound::Instant(at))) => Some(at),
            Some(None) => {
                errors.push(FieldError::new("from", INVALID_BOUND));
                None
            }
        };

        let until = match raw_to.map(parse_bound) {
            None => None,
            Some(bound) => {
                let end = bound.and_then(|bound| match bound {
                    Bound::Day(day) => start_of(day).checked_add_signed(Duration::days(1)),
                    // Postgres timestamps have microsecond precision.
                    Bound::Instant(at) => at.checked_add_signed(Duration::microseconds(1)),
                });
                if end.is_none() {
                    errors.push(FieldError::new("to", INVALID_BOUND));
                }
                end
            }
        };

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        if let (Some(start), Some(until)) = (start, until) {
            if start >= until {
                return Err(AppError::field("to", "\"to\" must not be earlier than \"from\"."));
            }
        }

        Ok(Self {
            from: start,
            until,
            raw_from: raw_from.map(String::from),
            raw_to: raw_to.map(String::from),
        })
    }

    /// No bounds at all.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_bounded(&self) -> bool {
        self.from.is_some() || self.until.is_some()
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| at >= from) && self.until.map_or(true, |until| at < until)
    }

    /// `None` when neither bound was supplied.
    pub fn echo(&self) -> Option<DateRangeEcho> {
        self.is_bounded().then(|| DateRangeEcho {
            from: self.raw_from.clone(),
            to: self.raw_to.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn missing_bounds_are_unbounded() {
        let range = DateRange::parse(None, Some("")).unwrap();
        assert!(!range.is_bounded());
        assert!(range.echo().is_none());
        assert!(range.contains(at(1999, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn date_only_bounds_include_whole_days() {
        let range = DateRange::parse(Some("2024-01-01"), Some("2024-01-31")).unwrap();

        assert!(range.contains(at(2024, 1, 1, 0, 0, 0)));
        assert!(range.contains(at(2024, 1, 31, 23, 59, 59)));
        assert!(!range.contains(at(2024, 2, 1, 0, 0, 0)));
        assert!(!range.contains(at(2023, 12, 31, 23, 59, 59)));
    }

    #[test]
    fn datetime_upper_bound_is_inclusive() {
        let range = DateRange::parse(None, Some("2024-03-10T12:00:00Z")).unwrap();
        assert!(range.contains(at(2024, 3, 10, 12, 0, 0)));
        assert!(!range.contains(at(2024, 3, 10, 12, 0, 1)));
    }

    #[test]
    fn single_day_range_is_valid() {
        let range = DateRange::parse(Some("2024-05-05"), Some("2024-05-05")).unwrap();
        assert!(range.contains(at(2024, 5, 5, 18, 30, 0)));
    }

    #[test]
    fn echo_returns_raw_values() {
        let range = DateRange::parse(Some("2024-01-01"), None).unwrap();
        assert_eq!(
            range.echo(),
            Some(DateRangeEcho {
                from: Some("2024-01-01".into()),
                to: None,
            })
        );
    }

    #[test_case(Some("yesterday"), None, "from")]
    #[test_case(None, Some("2024-13-01"), "to")]
    #[test_case(Some("2024-02-01"), Some("2024-01-01"), "to"; "reversed")]
    #[test_case(None, Some("+262142-12-31"), "to"; "last representable day")]
    fn invalid_bounds_name_the_field(from: Option<&str>, to: Option<&str>, field: &str) {
        match DateRange::parse(from, to) {
            Err(AppError::Validation(errors)) => assert_eq!(errors[0].field, field),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
