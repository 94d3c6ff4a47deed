use chrono::NaiveDate;
use serde::Serialize;

use crate::time::calendar::dayentry::DayEntry;

/// Classification of a single day.
///
/// `is_workday` is the final verdict; the other flags say how it was reached
/// and may overlap (a holiday on a Saturday is both `is_weekend` and
/// `is_holiday`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkdayClassification {
    #[serde(skip)]
    pub naive_date: NaiveDate,
    pub date: String,
    pub day_name: &'static str,
    pub is_weekend: bool,
    pub is_holiday: bool,
    pub is_workday: bool,
    pub is_in_lieu_day: bool,
    pub is_custom_workday: bool,
    pub is_custom_holiday: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holiday_info: Option<DayEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workday_info: Option<DayEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_lieu_day_info: Option<DayEntry>
}
