use chrono::NaiveDate;

/// Domain errors raised by the calendar and instant helpers.
///
/// Argument *shape* problems never reach this type; they are rejected while
/// the tool request is parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid date time '{0}'")]
    InvalidDateTime(String),

    #[error("start date {start} must not be after end date {end}")]
    InvalidRange {
        start: NaiveDate,
        end: NaiveDate
    },

    #[error("invalid month: {0} (must be 1..=12)")]
    InvalidMonth(u32),

    #[error("invalid quarter: {0} (must be 1..=4)")]
    InvalidQuarter(u32),

    #[error("invalid ISO week: {0} (must be 1..=53)")]
    InvalidWeek(u32),

    #[error("year {0} is out of the supported range")]
    InvalidYear(i32),

    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("time '{time}' does not exist in timezone {timezone}")]
    NonexistentLocalTime {
        time: String,
        timezone: String
    },

    #[error("unknown region '{0}', expected 'china' or 'standard'")]
    UnknownRegion(String),

    #[error("cannot render format '{0}'")]
    InvalidFormat(String),

    #[error("date arithmetic overflowed starting from {0}")]
    DateOverflow(NaiveDate),
}
