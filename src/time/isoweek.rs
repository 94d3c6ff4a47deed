use std::collections::BTreeSet;

use chrono::{
    Datelike,
    Days,
    NaiveDate,
    Weekday
};
use serde::Serialize;

use crate::time::calendarerror::CalendarError;
use crate::time::rangeofdates::RangeOfDates;
use crate::time::utility::{
    days_of_month,
    month_name,
    validate_month
};

const SIX_DAYS: Days = Days::new(6);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekOfYear {
    pub week: u32,
    pub iso_week: u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekDateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate
}

impl WeekDateRange {
    pub fn to_range(&self) -> RangeOfDates {
        // start is always six days before end
        RangeOfDates::new(self.start_date, self.end_date).unwrap_or_else(|_| RangeOfDates::single(self.start_date))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IsoWeeksInMonth {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub weeks: Vec<u32>,
    pub first_week: u32,
    pub last_week: u32,
    pub week_count: usize
}

/// Number of days in the month containing `d`.
pub fn days_in_month(d: NaiveDate) -> u32 {
    days_of_month(d.year(), d.month())
}

/// Locale (Sunday-start) week number alongside the ISO-8601 week number.
///
/// The locale week counts Sunday-to-Saturday weeks from the one containing
/// January 1st. A late-December date whose week already contains the next
/// January 1st belongs to week 1 of the following year.
pub fn week_of_year(d: NaiveDate) -> WeekOfYear {
    WeekOfYear {
        week: locale_week(d),
        iso_week: d.iso_week().week()
    }
}

fn sunday_week_start(d: NaiveDate) -> NaiveDate {
    d - Days::new(d.weekday().num_days_from_sunday() as u64)
}

fn locale_week(d: NaiveDate) -> u32 {
    let week_start = sunday_week_start(d);
    if d.month() == 12 && d.day() > 25 {
        if let Some(next_jan_1) = NaiveDate::from_ymd_opt(d.year() + 1, 1, 1) {
            if next_jan_1 <= week_start + SIX_DAYS {
                return 1;
            }
        }
    }
    let jan_1 = d.with_ordinal(1).unwrap_or(d);
    let year_start_week = sunday_week_start(jan_1);
    ((d - year_start_week).num_days() / 7 + 1) as u32
}

/// Number of ISO weeks (52 or 53) in ISO-year `year`.
pub fn weeks_in_iso_year(year: i32) -> Result<u32, CalendarError> {
    // December 28th always falls in the last ISO week of its year
    NaiveDate::from_ymd_opt(year, 12, 28)
        .map(|d| d.iso_week().week())
        .ok_or(CalendarError::InvalidYear(year))
}

/// Monday..Sunday span of ISO week `week` of ISO-year `year`.
///
/// Week 1 is the week holding the year's first Thursday, so it may start in
/// December of the previous Gregorian year. A week number past the last week
/// of a 52-week year resolves to that last week.
pub fn week_date_range(year: i32, week: u32) -> Result<WeekDateRange, CalendarError> {
    let last_week = weeks_in_iso_year(year)?;
    let week = week.clamp(1, last_week);
    let start_date = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
        .ok_or(CalendarError::InvalidYear(year))?;
    let end_date = start_date
        .checked_add_days(SIX_DAYS)
        .ok_or(CalendarError::DateOverflow(start_date))?;
    Ok(WeekDateRange { start_date, end_date })
}

/// ISO week numbers touched by the days of `year`-`month`.
///
/// Weeks are collected day by day, so January can report week 52/53 of the
/// previous ISO year and December week 1 of the next.
pub fn iso_weeks_in_month(year: i32, month: u32) -> Result<IsoWeeksInMonth, CalendarError> {
    let month = validate_month(month)?;
    let mut weeks: BTreeSet<u32> = BTreeSet::new();
    for day in 1..=days_of_month(year, month) {
        let d = NaiveDate::from_ymd_opt(year, month, day).ok_or(CalendarError::InvalidYear(year))?;
        weeks.insert(d.iso_week().week());
    }
    let weeks: Vec<u32> = weeks.into_iter().collect();
    let first_week = weeks.first().copied().unwrap_or_default();
    let last_week = weeks.last().copied().unwrap_or_default();
    Ok(IsoWeeksInMonth {
        year,
        month,
        month_name: month_name(month).to_owned(),
        week_count: weeks.len(),
        weeks,
        first_week,
        last_week
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn locale_week_matches_known_dates() {
        assert_eq!(week_of_year(ymd(2025, 1, 1)), WeekOfYear { week: 1, iso_week: 1 });
        assert_eq!(week_of_year(ymd(2025, 7, 1)), WeekOfYear { week: 27, iso_week: 27 });
        // Sunday 2025-03-23 opens a new locale week but closes ISO week 12
        assert_eq!(week_of_year(ymd(2025, 3, 23)), WeekOfYear { week: 13, iso_week: 12 });
    }

    #[test]
    fn late_december_rolls_into_week_one() {
        // week of Sun 2025-12-28 .. Sat 2026-01-03 contains next January 1st
        assert_eq!(week_of_year(ymd(2025, 12, 30)).week, 1);
        assert_eq!(week_of_year(ymd(2025, 12, 30)).iso_week, 1);
    }

    #[test]
    fn iso_year_lengths() {
        assert_eq!(weeks_in_iso_year(2020).unwrap(), 53);
        assert_eq!(weeks_in_iso_year(2023).unwrap(), 52);
        assert_eq!(weeks_in_iso_year(2026).unwrap(), 53);
    }

    #[test]
    fn real_week_53() {
        let range = week_date_range(2020, 53).unwrap();
        assert_eq!(range.start_date, ymd(2020, 12, 28));
        assert_eq!(range.end_date, ymd(2021, 1, 3));
    }

    #[test]
    fn january_reports_previous_iso_year_week() {
        let result = iso_weeks_in_month(2023, 1).unwrap();
        assert_eq!(result.weeks, vec![1, 2, 3, 4, 5, 52]);
        assert_eq!(result.first_week, 1);
        assert_eq!(result.last_week, 52);
        assert_eq!(result.month_name, "January");
    }

    #[test]
    fn rejects_month_out_of_range() {
        assert_eq!(iso_weeks_in_month(2025, 13), Err(CalendarError::InvalidMonth(13)));
    }
}
