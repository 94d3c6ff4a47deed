use std::fmt;

use chrono::NaiveDate;

use crate::time::calendarerror::CalendarError;
use crate::time::isoweek::week_date_range;
use crate::time::rangeofdates::RangeOfDates;
use crate::time::utility::{
    days_of_month,
    validate_month
};

/// Calendar period that a workday query walks over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week { year: i32, week: u32 },
    Month { year: i32, month: u32 },
    Quarter { year: i32, quarter: u32 },
    Year { year: i32 },
    Range { start_date: NaiveDate, end_date: NaiveDate }
}

impl Period {
    /// Expands the selector into the inclusive range of days it covers.
    pub fn to_range(&self) -> Result<RangeOfDates, CalendarError> {
        match *self {
            Period::Week { year, week } => {
                Ok(week_date_range(year, week)?.to_range())
            },
            Period::Month { year, month } => {
                let month = validate_month(month)?;
                month_span(year, month, month)
            },
            Period::Quarter { year, quarter } => {
                if !(1..=4).contains(&quarter) {
                    return Err(CalendarError::InvalidQuarter(quarter));
                }
                let first_month = (quarter - 1) * 3 + 1;
                month_span(year, first_month, first_month + 2)
            },
            Period::Year { year } => month_span(year, 1, 12),
            Period::Range { start_date, end_date } => RangeOfDates::new(start_date, end_date)
        }
    }
}

fn month_span(year: i32, first_month: u32, last_month: u32) -> Result<RangeOfDates, CalendarError> {
    let start = NaiveDate::from_ymd_opt(year, first_month, 1)
        .ok_or(CalendarError::InvalidYear(year))?;
    let end = NaiveDate::from_ymd_opt(year, last_month, days_of_month(year, last_month))
        .ok_or(CalendarError::InvalidYear(year))?;
    RangeOfDates::new(start, end)
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Week { year, week } => write!(f, "week {} of {}", week, year),
            Period::Month { year, month } => write!(f, "{}-{:02}", year, month),
            Period::Quarter { year, quarter } => write!(f, "Q{} {}", quarter, year),
            Period::Year { year } => write!(f, "{}", year),
            Period::Range { start_date, end_date } => write!(f, "{} to {}", start_date, end_date)
        }
    }
}
