use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const DATE_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const DATE_TIME_FORMATS: &[&str] = &[
    DATE_FMT,
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%d %B %Y",
];

// Parses a loosely formatted date or timestamp. Any UTC offset is dropped and the wall-clock
// time is kept as-is; all stored and compared timestamps are naive.
pub fn parse_naive_date_time(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in OFFSET_DATE_TIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_local());
        }
    }
    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_local());
    }
    None
}

pub fn format_date(date: &NaiveDateTime) -> String {
    format!("{}", date.format(DATE_FMT))
}

pub mod serializer {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde::de::Error;
    use crate::utils::date::{format_date, parse_naive_date_time};

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        format_date(time).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let str_time: String = Deserialize::deserialize(deserializer)?;
        parse_naive_date_time(&str_time)
            .ok_or_else(|| D::Error::custom(format!("invalid date {}", str_time)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime, Timelike};
    use crate::utils::date::{format_date, parse_naive_date_time};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).and_then(|d| d.and_hms_opt(h, min, s)).expect("valid date")
    }

    #[tokio::test]
    async fn test_should_parse_date_only() {
        assert_eq!(Some(at(2020, 1, 1, 0, 0, 0)), parse_naive_date_time("2020-01-01"));
        assert_eq!(Some(at(2020, 12, 31, 0, 0, 0)), parse_naive_date_time(" 2020-12-31 "));
        assert_eq!(Some(at(2021, 3, 4, 0, 0, 0)), parse_naive_date_time("2021/03/04"));
        assert_eq!(Some(at(2021, 3, 4, 0, 0, 0)), parse_naive_date_time("03/04/2021"));
    }

    #[tokio::test]
    async fn test_should_parse_naive_timestamps() {
        assert_eq!(Some(at(2020, 5, 6, 7, 8, 9)), parse_naive_date_time("2020-05-06T07:08:09"));
        assert_eq!(Some(at(2020, 5, 6, 7, 8, 9)), parse_naive_date_time("2020-05-06 07:08:09"));
        assert_eq!(Some(at(2020, 5, 6, 7, 8, 0)), parse_naive_date_time("2020-05-06T07:08"));
        let frac = parse_naive_date_time("2022-09-24T04:40:35.726029").expect("fractional");
        assert_eq!(726029000, frac.nanosecond());
    }

    #[tokio::test]
    async fn test_should_strip_offset_without_converting() {
        assert_eq!(Some(at(2020, 5, 6, 10, 0, 0)), parse_naive_date_time("2020-05-06T10:00:00+05:00"));
        assert_eq!(Some(at(2020, 5, 6, 10, 0, 0)), parse_naive_date_time("2020-05-06T10:00:00Z"));
        assert_eq!(Some(at(2020, 5, 6, 10, 0, 0)), parse_naive_date_time("2020-05-06 10:00:00-03:00"));
    }

    #[tokio::test]
    async fn test_should_reject_malformed_dates() {
        assert_eq!(None, parse_naive_date_time("not-a-date"));
        assert_eq!(None, parse_naive_date_time("2020-13-01"));
        assert_eq!(None, parse_naive_date_time("2020-02-30"));
        assert_eq!(None, parse_naive_date_time(""));
        assert_eq!(None, parse_naive_date_time("   "));
    }

    #[tokio::test]
    async fn test_should_format_sortable_dates() {
        let early = format_date(&at(2020, 1, 1, 0, 0, 0));
        let late = format_date(&at(2020, 1, 1, 0, 0, 1));
        assert_eq!("2020-01-01T00:00:00", early.as_str());
        assert!(early < late);
        assert_eq!(Some(at(2020, 1, 1, 0, 0, 0)), parse_naive_date_time(early.as_str()));
    }
}
