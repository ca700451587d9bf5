use chrono::{DateTime, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use spdlog::warn;

const MONTH_NAMES: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

const WORDS_PER_MINUTE: usize = 200;

/// Normalizes a free-text date to a comparable timestamp. Posts carry the
/// date exactly as written in the front-matter, so this runs wherever
/// posts are sorted. Unparseable dates fall back to the Unix epoch, which
/// sorts them to the oldest position.
pub fn normalize_date(buf: &str) -> NaiveDateTime {
    match try_parse_date(buf) {
        Some(date_time) => date_time,
        None => {
            warn!("Unable to parse date '{}'. Sorting as epoch", buf);
            NaiveDateTime::UNIX_EPOCH
        }
    }
}

fn try_parse_date(buf: &str) -> Option<NaiveDateTime> {
    let buf = buf.trim();
    if buf.is_empty() {
        return None;
    }

    // First match wins
    if let Some(date_time) = parse_native(buf) {
        return Some(date_time);
    }
    if let Some(date) = parse_month_name(buf) {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Some(date) = parse_iso_like(buf) {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Some(date) = parse_slash(buf) {
        return date.and_hms_opt(0, 0, 0);
    }

    None
}

fn parse_native(buf: &str) -> Option<NaiveDateTime> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(buf) {
        return Some(date_time.naive_utc());
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
    ];
    for fmt in formats {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(buf, fmt) {
            return Some(date_time);
        }
    }

    None
}

/// `<Month-name> <day> <year>` with a 3+ letter English month name or
/// abbreviation. No locale support.
fn parse_month_name(buf: &str) -> Option<NaiveDate> {
    lazy_static! {
        static ref MONTH_NAME_REGEX: Regex = Regex::new(
            r"^(?P<month>[A-Za-z]{3,})\.?\s+(?P<day>\d{1,2}),?\s+(?P<year>\d{4})$"
        ).unwrap();
    }

    let caps = MONTH_NAME_REGEX.captures(buf)?;
    let month = month_from_name(&caps["month"])?;
    let day: u32 = caps["day"].parse().ok()?;
    let year: i32 = caps["year"].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_from_name(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|full| full.starts_with(&name))
        .map(|idx| idx as u32 + 1)
}

/// `YYYY-M-D`, single-digit month and day allowed.
fn parse_iso_like(buf: &str) -> Option<NaiveDate> {
    lazy_static! {
        static ref ISO_LIKE_REGEX: Regex =
            Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").unwrap();
    }

    let caps = ISO_LIKE_REGEX.captures(buf)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// `M/D/YYYY`, always month-first.
fn parse_slash(buf: &str) -> Option<NaiveDate> {
    lazy_static! {
        static ref SLASH_REGEX: Regex =
            Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").unwrap();
    }

    let caps = SLASH_REGEX.captures(buf)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Estimated reading time in whole minutes, as displayed next to a post.
/// Word count over 200 wpm, rounded up, never below one minute.
pub fn reading_time(content: &str) -> String {
    let words = content.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    minutes.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format_date(date_time: &NaiveDateTime) -> String {
        date_time.format("%Y-%m-%d").to_string()
    }

    #[test]
    fn test_same_date_across_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 10, 12).unwrap();

        let variants = ["2024-10-12", "Oct 12 2024", "October 12, 2024", "10/12/2024"];
        for variant in variants {
            let date_time = normalize_date(variant);
            assert_eq!(date_time.date(), expected, "variant: {}", variant);
        }
    }

    #[test]
    fn test_native_formats() {
        let date_time = normalize_date("2017-09-10 10:42:32.123");
        assert_eq!(format_date(&date_time), "2017-09-10");

        let date_time = normalize_date("2017-09-10T10:42:32");
        assert_eq!(format_date(&date_time), "2017-09-10");

        let date_time = normalize_date("2017-09-10T10:42:32+02:00");
        assert_eq!(format_date(&date_time), "2017-09-10");
    }

    #[test]
    fn test_single_digit_month_and_day() {
        let date_time = normalize_date("2024-1-5");
        assert_eq!(format_date(&date_time), "2024-01-05");

        let date_time = normalize_date("1/5/2024");
        assert_eq!(format_date(&date_time), "2024-01-05");
    }

    #[test]
    fn test_month_abbreviations() {
        assert_eq!(month_from_name("Jan"), Some(1));
        assert_eq!(month_from_name("sept"), Some(9));
        assert_eq!(month_from_name("December"), Some(12));
        assert_eq!(month_from_name("Foo"), None);
    }

    #[test]
    fn test_unparseable_falls_back_to_epoch() {
        assert_eq!(normalize_date("next tuesday"), NaiveDateTime::UNIX_EPOCH);
        assert_eq!(normalize_date(""), NaiveDateTime::UNIX_EPOCH);
        // Out-of-range components are rejected, not clamped
        assert_eq!(normalize_date("2024-13-40"), NaiveDateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time("a few words"), "1");

        let two_minutes = "word ".repeat(201);
        assert_eq!(reading_time(&two_minutes), "2");

        assert_eq!(reading_time(""), "1");
    }
}
