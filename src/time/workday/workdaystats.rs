use serde::Serialize;

use crate::time::workday::workdayclassification::WorkdayClassification;
use crate::time::workday::workdaypolicy::Region;

/// 區間統計：每個分類旗標各一個計數。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkdayStats {
    pub total_days: usize,
    pub workdays: usize,
    pub weekends: usize,
    pub holidays: usize,
    pub in_lieu_days: usize,
    pub custom_workdays: usize,
    pub custom_holidays: usize,
    pub start_date: String,
    pub end_date: String,
    pub region: Region
}

impl WorkdayStats {
    pub fn new(start_date: String, end_date: String, region: Region) -> WorkdayStats {
        WorkdayStats {
            total_days: 0,
            workdays: 0,
            weekends: 0,
            holidays: 0,
            in_lieu_days: 0,
            custom_workdays: 0,
            custom_holidays: 0,
            start_date,
            end_date,
            region
        }
    }

    pub fn tally(&mut self, day: &WorkdayClassification) {
        self.total_days += 1;
        self.workdays += day.is_workday as usize;
        self.weekends += day.is_weekend as usize;
        self.holidays += day.is_holiday as usize;
        self.in_lieu_days += day.is_in_lieu_day as usize;
        self.custom_workdays += day.is_custom_workday as usize;
        self.custom_holidays += day.is_custom_holiday as usize;
    }

    pub fn non_workdays(&self) -> usize {
        self.total_days - self.workdays
    }
}
