use chrono::{Days, NaiveDate};

const ONE_DAY: Days = Days::new(1);

/// A calendar that can tell rest days from working days.
///
/// Implementors only answer `is_holiday`; navigation over business days is
/// derived from it. `Send + Sync` so calendars can be shared through `Arc`
/// between request tasks.
pub trait HolidayCalendar: Send + Sync {
    fn is_holiday(&self, d: NaiveDate) -> bool;

    fn is_business_day(&self, d: NaiveDate) -> bool {
        !self.is_holiday(d)
    }

    /// Moves `n` business days away from `horizon` (backwards when `n` is
    /// negative). `horizon` itself is never counted; `n == 0` returns it
    /// unchanged. `None` when the walk leaves chrono's date range.
    fn shift_n_business_day(&self, horizon: NaiveDate, n: i32) -> Option<NaiveDate> {
        let shift_one_day = if n >= 0 {
            |d: NaiveDate| d.checked_add_days(ONE_DAY)
        } else {
            |d: NaiveDate| d.checked_sub_days(ONE_DAY)
        };

        let mut m = n.unsigned_abs();
        let mut d = horizon;
        while m > 0 {
            d = shift_one_day(d)?;
            m -= self.is_business_day(d) as u32;
        }
        Some(d)
    }
}
