//! Best-effort conversion of raw CSV text into typed values.
//!
//! Every function returns `None` for values that cannot be interpreted, so each
//! statistic can skip the row instead of folding a fake zero into its result.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Label used when a grouping field (user, version) is absent.
pub const UNKNOWN: &str = "Unknown";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// True when the field is non-null and non-blank after trimming.
pub fn present(raw: Option<&str>) -> bool {
    raw.is_some_and(|s| !s.trim().is_empty())
}

/// Trimmed value, or [`UNKNOWN`] when the field is not present.
pub fn text_or_unknown(raw: Option<&str>) -> &str {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => UNKNOWN,
    }
}

/// Parse a whole number, accepting integral floats such as `"4.0"`.
fn whole_number(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }
    let f = trimmed.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// A star rating in `1..=5`.
pub fn score(raw: Option<&str>) -> Option<u8> {
    let n = whole_number(raw?)?;
    (1..=5).contains(&n).then_some(n as u8)
}

/// A non-negative counter such as `thumbsUpCount`.
pub fn count(raw: Option<&str>) -> Option<u64> {
    let n = whole_number(raw?)?;
    u64::try_from(n).ok()
}

/// Parse a review timestamp.
///
/// Slash-separated dates are read month-first (`03/04/2024` is March 4th).
pub fn timestamp(raw: Option<&str>) -> Option<NaiveDateTime> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn score_accepts_only_one_to_five() {
        assert_eq!(score(Some("5")), Some(5));
        assert_eq!(score(Some(" 3 ")), Some(3));
        assert_eq!(score(Some("4.0")), Some(4));
        assert_eq!(score(Some("0")), None);
        assert_eq!(score(Some("6")), None);
        assert_eq!(score(Some("4.5")), None);
        assert_eq!(score(Some("N/A")), None);
        assert_eq!(score(Some("")), None);
        assert_eq!(score(None), None);
    }

    #[test]
    fn count_rejects_negative_and_garbage() {
        assert_eq!(count(Some("0")), Some(0));
        assert_eq!(count(Some("1234")), Some(1234));
        assert_eq!(count(Some("12.0")), Some(12));
        assert_eq!(count(Some("-1")), None);
        assert_eq!(count(Some("many")), None);
        assert_eq!(count(None), None);
    }

    #[test]
    fn timestamp_handles_common_layouts() {
        let dt = timestamp(Some("2024-03-04 10:11:12")).expect("iso-like");
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 3, 4));
        assert_eq!(dt.hour(), 10);

        let dt = timestamp(Some("2024-03-04T10:11:12Z")).expect("rfc3339");
        assert_eq!(dt.minute(), 11);

        // The day written in the string wins over the UTC day
        let dt = timestamp(Some("2024-03-04T22:30:00-05:00")).expect("offset");
        assert_eq!((dt.day(), dt.hour()), (4, 22));

        let dt = timestamp(Some("03/04/2024 09:30")).expect("month-first");
        assert_eq!((dt.month(), dt.day()), (3, 4));

        let dt = timestamp(Some("2024-03-04")).expect("date only");
        assert_eq!(dt.hour(), 0);

        assert!(timestamp(Some("yesterday")).is_none());
        assert!(timestamp(Some("   ")).is_none());
        assert!(timestamp(None).is_none());
    }

    #[test]
    fn presence_and_unknown_fallback() {
        assert!(present(Some("x")));
        assert!(!present(Some("  \t")));
        assert!(!present(None));

        assert_eq!(text_or_unknown(Some(" 8.1.0 ")), "8.1.0");
        assert_eq!(text_or_unknown(Some("")), UNKNOWN);
        assert_eq!(text_or_unknown(None), UNKNOWN);
    }
}
