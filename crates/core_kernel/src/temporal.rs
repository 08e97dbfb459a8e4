//! Calendar helpers
//!
//! Installment due dates, batch dates and training periods are plain calendar
//! dates. "Today" depends on where the academy operates, so the current date
//! is always resolved through a configured [`Timezone`].

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// Timezone wrapper used to resolve the current business date
///
/// Wraps chrono_tz::Tz with string serialization ("Africa/Tunis").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Timezone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.name())
    }
}

impl FromStr for Timezone {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tz::from_str(s)
            .map(Timezone)
            .map_err(|_| TemporalError::UnknownTimezone(s.to_string()))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Returns the calendar date of `instant` in this timezone
    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.0).date_naive()
    }

    /// Returns today's date in this timezone
    pub fn today(&self) -> NaiveDate {
        self.date_of(Utc::now())
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::UTC)
    }
}

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must not be after end {end}")]
    InvalidPeriod {
        start: String,
        end: String,
    },

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Date out of range")]
    OutOfRange,
}

/// An inclusive range of calendar dates, e.g. a training's start and end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days between start and end
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// True once `date` is past the end of the range
    pub fn has_ended(&self, date: NaiveDate) -> bool {
        date > self.end
    }

    /// True while `date` is still before the start of the range
    pub fn is_upcoming(&self, date: NaiveDate) -> bool {
        date < self.start
    }
}

/// Whole days from `from` until `to` (negative when `to` is in the past)
pub fn days_until(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Shifts a date back by `days`, failing on calendar underflow
pub fn days_before(date: NaiveDate, days: u32) -> Result<NaiveDate, TemporalError> {
    date.checked_sub_days(Days::new(u64::from(days)))
        .ok_or(TemporalError::OutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_rejects_inverted_bounds() {
        assert!(DateRange::new(date(2024, 4, 15), date(2024, 1, 15)).is_err());
        assert!(DateRange::new(date(2024, 1, 15), date(2024, 1, 15)).is_ok());
    }

    #[test]
    fn test_date_range_phases() {
        let range = DateRange::new(date(2024, 1, 15), date(2024, 4, 15)).unwrap();
        assert!(range.is_upcoming(date(2024, 1, 1)));
        assert!(range.contains(date(2024, 2, 1)));
        assert!(range.has_ended(date(2024, 4, 16)));
        assert_eq!(range.days(), 91);
    }

    #[test]
    fn test_timezone_date_of() {
        let tz: Timezone = "Pacific/Auckland".parse().unwrap();
        let instant = Utc.with_ymd_and_hms(2024, 1, 14, 20, 0, 0).unwrap();
        assert_eq!(tz.date_of(instant), date(2024, 1, 15));
        assert_eq!(Timezone::default().date_of(instant), date(2024, 1, 14));
    }

    #[test]
    fn test_unknown_timezone() {
        let err = "Mars/Olympus".parse::<Timezone>().unwrap_err();
        assert_eq!(err, TemporalError::UnknownTimezone("Mars/Olympus".to_string()));
    }

    #[test]
    fn test_days_helpers() {
        assert_eq!(days_until(date(2024, 1, 10), date(2024, 1, 15)), 5);
        assert_eq!(days_until(date(2024, 1, 15), date(2024, 1, 10)), -5);
        assert_eq!(days_before(date(2024, 3, 1), 1).unwrap(), date(2024, 2, 29));
    }
}
