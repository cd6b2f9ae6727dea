//! Publication dates as written in front-matter

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeDelta, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid date `{0}`")]
pub struct InvalidDate(pub String);

/// Formats carrying an explicit UTC offset
const OFFSET_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%d %H:%M %z",
    "%Y/%m/%d %H:%M:%S %z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%dT%H:%M%z",
];

const NAIVE_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Date of a post, optionally with a time of day and an offset.
///
/// Values without an offset are ordered as if they were UTC. A date-only
/// value stays date-only when written back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostDate {
    naive: NaiveDateTime,
    offset: Option<FixedOffset>,
    has_time: bool,
}

impl PostDate {
    /// A date-only value
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?;
        Some(Self {
            naive,
            offset: None,
            has_time: false,
        })
    }

    pub fn from_naive(naive: NaiveDateTime) -> Self {
        Self {
            naive,
            offset: None,
            has_time: true,
        }
    }

    pub fn from_datetime(dt: DateTime<FixedOffset>) -> Self {
        Self {
            naive: dt.naive_local(),
            offset: Some(*dt.offset()),
            has_time: true,
        }
    }

    /// The moment in UTC this date refers to; the sort key of a post
    pub fn instant(&self) -> NaiveDateTime {
        match self.offset {
            Some(offset) => self.naive - TimeDelta::seconds(i64::from(offset.local_minus_utc())),
            None => self.naive,
        }
    }

    pub fn to_datetime(&self) -> DateTime<FixedOffset> {
        let offset = self.offset.unwrap_or_else(|| Utc.fix());
        DateTime::from_naive_utc_and_offset(self.instant(), offset)
    }

    pub fn year(&self) -> i32 {
        self.naive.year()
    }

    pub fn has_time(&self) -> bool {
        self.has_time
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }
}

impl FromStr for PostDate {
    type Err = InvalidDate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::from_datetime(dt));
        }

        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
                return Ok(Self::from_datetime(dt));
            }
        }

        for fmt in NAIVE_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Self::from_naive(dt));
            }
        }

        for fmt in DATE_FORMATS {
            if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
                if let Some(date) = Self::from_ymd(d.year(), d.month(), d.day()) {
                    return Ok(date);
                }
            }
        }

        Err(InvalidDate(s.to_string()))
    }
}

impl fmt::Display for PostDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.has_time, self.offset) {
            (false, _) => write!(f, "{}", self.naive.format("%Y-%m-%d")),
            (true, None) => write!(f, "{}", self.naive.format("%Y-%m-%d %H:%M:%S%.f")),
            (true, Some(offset)) => write!(
                f,
                "{}",
                DateTime::<FixedOffset>::from_naive_utc_and_offset(self.instant(), offset)
                    .format("%Y-%m-%d %H:%M:%S%.f %z")
            ),
        }
    }
}

impl PartialOrd for PostDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PostDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant()
            .cmp(&other.instant())
            .then_with(|| self.naive.cmp(&other.naive))
            .then_with(|| {
                let a = self.offset.map(|o| o.local_minus_utc());
                let b = other.offset.map(|o| o.local_minus_utc());
                a.cmp(&b)
            })
            .then_with(|| self.has_time.cmp(&other.has_time))
    }
}

impl Serialize for PostDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PostDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PostDateVisitor;

        impl de::Visitor<'_> for PostDateVisitor {
            type Value = PostDate;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a date such as 2024-01-15 or 2024-01-15 10:30:00 +0800")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<PostDate, E> {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(PostDateVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_only() {
        let date: PostDate = "2024-01-15".parse().unwrap();
        assert!(!date.has_time());
        assert_eq!(date.to_string(), "2024-01-15");
        assert_eq!(date.year(), 2024);
    }

    #[test]
    fn test_parse_slash_date() {
        let date: PostDate = "2024/01/15 10:30:00".parse().unwrap();
        assert_eq!(date.to_string(), "2024-01-15 10:30:00");
    }

    #[test]
    fn test_parse_with_offset() {
        let date: PostDate = "2018-06-23 10:00:00 +0800".parse().unwrap();
        assert_eq!(date.offset(), FixedOffset::east_opt(8 * 3600));
        assert_eq!(
            date.instant(),
            NaiveDate::from_ymd_opt(2018, 6, 23)
                .unwrap()
                .and_hms_opt(2, 0, 0)
                .unwrap()
        );
        assert_eq!(date.to_string(), "2018-06-23 10:00:00 +0800");
    }

    #[test]
    fn test_parse_rfc3339() {
        let date: PostDate = "2024-01-15T10:30:00+02:00".parse().unwrap();
        assert_eq!(date.to_datetime().to_rfc3339(), "2024-01-15T10:30:00+02:00");
    }

    #[test]
    fn test_reject_garbage() {
        assert_eq!(
            "yesterday".parse::<PostDate>(),
            Err(InvalidDate("yesterday".to_string()))
        );
        assert!("2024-13-40".parse::<PostDate>().is_err());
    }

    #[test]
    fn test_order_uses_instant() {
        let east: PostDate = "2020-01-01 08:00:00 +0800".parse().unwrap();
        let utc: PostDate = "2020-01-01 01:00:00".parse().unwrap();
        assert!(utc > east);
    }

    #[test]
    fn test_display_round_trips() {
        for raw in [
            "2019-03-02",
            "2019-03-02 07:08:09",
            "2019-03-02 07:08:09 -0500",
            "2019-03-02 07:08:09.250",
        ] {
            let date: PostDate = raw.parse().unwrap();
            let again: PostDate = date.to_string().parse().unwrap();
            assert_eq!(date, again, "{raw}");
        }
    }

    #[test]
    fn test_deserialize_rejects_number() {
        let err = serde_yaml::from_str::<PostDate>("2024").unwrap_err();
        assert!(err.to_string().contains("invalid type"));
    }
}
