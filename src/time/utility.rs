use chrono::{
    NaiveDate,
    Weekday
};

use crate::time::calendarerror::CalendarError;


#[inline]
pub const fn is_leap (year: i32) -> bool {
    ((year % 4 == 0) && (year % 100!= 0)) || (year % 400 == 0)
}


pub const fn days_of_month (year: i32, month: u32) -> u32 {
    const NO_LEAP_EOM: [u32; 13] = [
        0, 31, 28, 31, 30,
        31, 30, 31, 31, 30,
        31, 30, 31
    ];

    const LEAP_EOM: [u32; 13] = [
        0, 31, 29, 31, 30,
        31, 30, 31, 31, 30,
        31, 30, 31
    ];

    if is_leap(year) {
        LEAP_EOM[month as usize]
    } else {
        NO_LEAP_EOM[month as usize]
    }
}

pub const fn month_name (month: u32) -> &'static str {
    const MONTH_NAMES: [&str; 13] = [
        "",
        "January", "February", "March", "April",
        "May", "June", "July", "August",
        "September", "October", "November", "December"
    ];
    MONTH_NAMES[month as usize]
}

pub const fn weekday_name (weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday"
    }
}

pub fn validate_month(month: u32) -> Result<u32, CalendarError> {
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(CalendarError::InvalidMonth(month))
    }
}

/// Parses a calendar date written as `YYYY-MM-DD`.
///
/// A trailing time-of-day part (`YYYY-MM-DD HH:mm:ss` or the `T` form) is
/// accepted and ignored, since callers often pass full timestamps to the
/// date-only tools.
pub fn parse_date(date_str: &str) -> Result<NaiveDate, CalendarError> {
    let trimmed = date_str.trim();
    let date_part = trimmed
        .split(|c| c == ' ' || c == 'T')
        .next()
        .unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| CalendarError::InvalidDate(date_str.to_owned()))
}

/// Parses exactly `YYYY-MM-DD`, with no trailing text of any kind.
pub fn parse_strict_date(date_str: &str) -> Result<NaiveDate, CalendarError> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .map_err(|_| CalendarError::InvalidDate(date_str.to_owned()))
}

/// Parses a list of exact `YYYY-MM-DD` dates, failing on the first bad entry.
pub fn parse_dates<S: AsRef<str>>(date_strs: &[S]) -> Result<Vec<NaiveDate>, CalendarError> {
    date_strs.iter().map(|s| parse_strict_date(s.as_ref())).collect()
}
