use chrono::{
    Datelike,
    NaiveDate,
    Weekday
};

use crate::time::calendar::holidaycalendar::HolidayCalendar;

/// Weekend days as a bitmask: Mon(0), Tue(1), ..., Sun(6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekendMask(u8);

impl WeekendMask {
    pub fn new(weekends: &[Weekday]) -> Self {
        let mut mask = 0u8;
        for &weekday in weekends {
            mask |= 1u8 << weekday.num_days_from_monday();
        }
        WeekendMask(mask)
    }

    #[inline]
    pub fn is_weekend(&self, weekday: Weekday) -> bool {
        let bit = 1u8 << weekday.num_days_from_monday();
        (self.0 & bit) != 0
    }
}

impl Default for WeekendMask {
    fn default() -> Self {
        WeekendMask::new(&[Weekday::Sat, Weekday::Sun])
    }
}

/// Monday-to-Friday calendar: every weekend day is a rest day, nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCalendar {
    weekends: WeekendMask
}

impl StandardCalendar {
    #[inline]
    pub fn is_weekend(&self, d: NaiveDate) -> bool {
        self.weekends.is_weekend(d.weekday())
    }
}

impl HolidayCalendar for StandardCalendar {
    fn is_holiday(&self, d: NaiveDate) -> bool {
        self.is_weekend(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_mask_is_saturday_and_sunday() {
        let mask = WeekendMask::default();
        assert!(mask.is_weekend(Weekday::Sat));
        assert!(mask.is_weekend(Weekday::Sun));
        assert!(!mask.is_weekend(Weekday::Fri));
        assert!(!mask.is_weekend(Weekday::Mon));
    }

    #[test]
    fn weekends_are_rest_days() {
        let calendar = StandardCalendar::default();
        assert!(calendar.is_holiday(ymd(2025, 3, 22)));
        assert!(calendar.is_holiday(ymd(2025, 3, 23)));
        assert!(calendar.is_business_day(ymd(2025, 3, 24)));
    }

    #[test]
    fn shifting_skips_weekends() {
        let calendar = StandardCalendar::default();
        let friday = ymd(2025, 3, 21);
        assert_eq!(calendar.shift_n_business_day(friday, 1), Some(ymd(2025, 3, 24)));
        assert_eq!(calendar.shift_n_business_day(ymd(2025, 3, 24), -1), Some(friday));
        assert_eq!(calendar.shift_n_business_day(friday, 0), Some(friday));
        assert_eq!(calendar.shift_n_business_day(friday, 6), Some(ymd(2025, 3, 31)));
    }
}
