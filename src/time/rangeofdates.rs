use chrono::{
    Days,
    NaiveDate
};

use crate::time::calendarerror::CalendarError;

/// Inclusive span of calendar days, `start_date ..= end_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeOfDates {
    start_date: NaiveDate,
    end_date: NaiveDate
}

impl RangeOfDates {
    /// Builds a range from caller-supplied bounds.
    ///
    /// Unlike a symmetric span, the bounds are not swapped: a start after the
    /// end is a caller mistake and is reported as `InvalidRange`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<RangeOfDates, CalendarError> {
        if start_date > end_date {
            Err(CalendarError::InvalidRange { start: start_date, end: end_date })
        } else {
            Ok(RangeOfDates { start_date, end_date })
        }
    }

    pub fn single(d: NaiveDate) -> RangeOfDates {
        RangeOfDates { start_date: d, end_date: d }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn len(&self) -> usize {
        ((self.end_date - self.start_date).num_days() + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> RangeOfDatesIterator<'_> {
        RangeOfDatesIterator {
            range_of_dates: self,
            index: 0,
        }
    }
}

impl<'a> IntoIterator for &'a RangeOfDates {
    type Item = NaiveDate;
    type IntoIter = RangeOfDatesIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct RangeOfDatesIterator<'a> {
    range_of_dates: &'a RangeOfDates,
    index: usize,
}

impl<'a> Iterator for RangeOfDatesIterator<'a> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index < self.range_of_dates.len() {
            let result = self.range_of_dates.start_date()
                .checked_add_days(Days::new(self.index as u64));
            self.index += 1;
            result
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.range_of_dates.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}
