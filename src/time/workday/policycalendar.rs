use chrono::NaiveDate;

use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::workday::workdayclassifier::WorkdayClassifier;
use crate::time::workday::workdaypolicy::WorkdayPolicy;

/// A classifier bound to one policy, seen as a [`HolidayCalendar`].
#[derive(Clone, Copy)]
pub struct PolicyCalendar<'a> {
    classifier: &'a WorkdayClassifier,
    policy: &'a WorkdayPolicy
}

impl<'a> PolicyCalendar<'a> {
    pub fn new(classifier: &'a WorkdayClassifier, policy: &'a WorkdayPolicy) -> PolicyCalendar<'a> {
        PolicyCalendar { classifier, policy }
    }
}

impl HolidayCalendar for PolicyCalendar<'_> {
    fn is_holiday(&self, d: NaiveDate) -> bool {
        !self.classifier.is_workday(d, self.policy)
    }
}
