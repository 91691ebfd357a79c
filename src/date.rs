//! Calendar-day helpers for habit day-keys.
//!
//! A day-key is a `YYYY-MM-DD` string for a local calendar day. Keys compare
//! lexicographically in the same order as the days they name.

use chrono::{Duration, Local, NaiveDate};

/// Canonical day-key format.
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Format a calendar date as a zero-padded day-key.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Current local calendar day.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Day-key for the current local calendar day.
pub fn today_key() -> String {
    format_date(today())
}

/// Parse a day-key, accepting only the canonical form.
///
/// chrono happily reads `2024-1-5` with `%m`/`%d`, so the parsed date is
/// formatted back and compared to the input.
pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(key, DAY_KEY_FORMAT).ok()?;
    (format_date(date) == key).then_some(date)
}

/// Whether `key` is a canonical day-key.
pub fn is_day_key(key: &str) -> bool {
    parse_day_key(key).is_some()
}

/// The calendar day before `date`, if representable.
pub fn previous_day(date: NaiveDate) -> Option<NaiveDate> {
    date.pred_opt()
}

/// Whole calendar days from `from` to `to` (negative if `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// The `count` days ending at `reference` inclusive, oldest first.
///
/// Stops at the earliest representable date.
pub fn trailing_days(reference: NaiveDate, count: u32) -> Vec<NaiveDate> {
    let count = i64::from(count).min(days_between(NaiveDate::MIN, reference) + 1);
    (0..count)
        .rev()
        .filter_map(|offset| reference.checked_sub_signed(Duration::days(offset)))
        .collect()
}

/// Long header form of a date, e.g. "October 15".
pub fn header_date(date: NaiveDate) -> String {
    date.format("%B %-d").to_string()
}

/// Parse a user-supplied day: `today`, `yesterday`, `YYYY-MM-DD` or `YYYYMMDD`.
pub fn parse_user_day(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("today") {
        return Some(today);
    }
    if trimmed.eq_ignore_ascii_case("yesterday") {
        return previous_day(today);
    }
    if trimmed.len() == 8
        && let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y%m%d")
    {
        return Some(date);
    }
    NaiveDate::parse_from_str(trimmed, DAY_KEY_FORMAT).ok()
}
