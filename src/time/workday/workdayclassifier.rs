use std::sync::Arc;

use chrono::{
    Datelike,
    NaiveDate
};
use log::debug;

use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::calendar::holidayregistry::HolidayRegistry;
use crate::time::calendar::standardcalendar::StandardCalendar;
use crate::time::calendarerror::CalendarError;
use crate::time::dateformat::DateFormat;
use crate::time::period::Period;
use crate::time::rangeofdates::RangeOfDates;
use crate::time::utility::weekday_name;
use crate::time::workday::policycalendar::PolicyCalendar;
use crate::time::workday::workdayclassification::WorkdayClassification;
use crate::time::workday::workdaypolicy::WorkdayPolicy;
use crate::time::workday::workdaystats::WorkdayStats;

/// Decides whether days are workdays under a [`WorkdayPolicy`].
///
/// Precedence for one date:
/// 1. custom workday
/// 2. custom holiday
/// 3. holiday registry, when the policy asks for it
/// 4. Saturday/Sunday weekend
pub struct WorkdayClassifier {
    registry: Arc<HolidayRegistry>,
    standard: StandardCalendar
}

impl WorkdayClassifier {
    pub fn new(registry: Arc<HolidayRegistry>) -> WorkdayClassifier {
        WorkdayClassifier {
            registry,
            standard: StandardCalendar::default()
        }
    }

    pub fn registry(&self) -> &Arc<HolidayRegistry> {
        &self.registry
    }

    /// Makes sure the registry is loaded before a registry-backed query;
    /// `refresh` forces a download first. No-op for policies that never
    /// look at the registry.
    pub async fn prepare(&self, policy: &WorkdayPolicy, refresh: bool) {
        if !policy.uses_registry() {
            return;
        }
        if refresh && !self.registry.refresh().await {
            debug!("forced holiday refresh failed, continuing with cached data");
        }
        self.registry.initialize().await;
    }

    /// Final verdict only, without building a record.
    pub fn is_workday(&self, d: NaiveDate, policy: &WorkdayPolicy) -> bool {
        if policy.is_custom_workday(d) {
            return true;
        }
        if policy.is_custom_holiday(d) {
            return false;
        }
        if policy.uses_registry() {
            return self.registry.is_standard_workday_under_regional_calendar(d);
        }
        self.standard.is_business_day(d)
    }

    pub fn classify(&self, d: NaiveDate, policy: &WorkdayPolicy, format: &DateFormat) -> Result<WorkdayClassification, CalendarError> {
        let is_weekend = self.standard.is_weekend(d);
        let mut day = WorkdayClassification {
            naive_date: d,
            date: format.format_date(d)?,
            day_name: weekday_name(d.weekday()),
            is_weekend,
            is_holiday: false,
            is_workday: false,
            is_in_lieu_day: false,
            is_custom_workday: false,
            is_custom_holiday: false,
            holiday_info: None,
            workday_info: None,
            in_lieu_day_info: None
        };

        if policy.is_custom_workday(d) {
            day.is_custom_workday = true;
            day.is_workday = true;
            day.is_weekend = false;
            return Ok(day);
        }

        // weekend flag stays as computed
        if policy.is_custom_holiday(d) {
            day.is_custom_holiday = true;
            day.is_holiday = true;
            return Ok(day);
        }

        if policy.uses_registry() {
            day.holiday_info = self.registry.holiday_info(d);
            day.workday_info = self.registry.workday_info(d);
            day.in_lieu_day_info = self.registry.in_lieu_day_info(d);
            day.is_holiday = day.holiday_info.is_some();
            day.is_in_lieu_day = day.in_lieu_day_info.is_some();
            day.is_workday = self.registry.is_standard_workday_under_regional_calendar(d);
        } else {
            day.is_workday = self.standard.is_business_day(d);
        }
        Ok(day)
    }

    pub fn classify_range(&self, range: &RangeOfDates, policy: &WorkdayPolicy, format: &DateFormat) -> Result<Vec<WorkdayClassification>, CalendarError> {
        range
            .iter()
            .map(|d| self.classify(d, policy, format))
            .collect()
    }

    /// Workdays of `period`, in date order.
    pub fn workdays(&self, period: &Period, policy: &WorkdayPolicy, format: &DateFormat) -> Result<Vec<WorkdayClassification>, CalendarError> {
        let range = period.to_range()?;
        let mut workdays = Vec::with_capacity(range.len());
        for d in &range {
            if self.is_workday(d, policy) {
                workdays.push(self.classify(d, policy, format)?);
            }
        }
        Ok(workdays)
    }

    pub fn stats(&self, period: &Period, policy: &WorkdayPolicy, format: &DateFormat) -> Result<WorkdayStats, CalendarError> {
        let range = period.to_range()?;
        let mut stats = WorkdayStats::new(
            format.format_date(range.start_date())?,
            format.format_date(range.end_date())?,
            policy.region()
        );
        for d in &range {
            stats.tally(&self.classify(d, policy, format)?);
        }
        Ok(stats)
    }

    pub fn calendar<'a>(&'a self, policy: &'a WorkdayPolicy) -> PolicyCalendar<'a> {
        PolicyCalendar::new(self, policy)
    }

    /// Moves `n` workdays away from `d`; negative `n` goes backwards and
    /// `n == 0` returns `d` even when it is not a workday.
    pub fn add_workdays(&self, d: NaiveDate, n: i32, policy: &WorkdayPolicy) -> Result<NaiveDate, CalendarError> {
        self.calendar(policy)
            .shift_n_business_day(d, n)
            .ok_or(CalendarError::DateOverflow(d))
    }
}
