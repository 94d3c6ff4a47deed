use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::time::calendarerror::CalendarError;

/// Which weekly rule a workday query follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Monday to Friday.
    #[default]
    Standard,
    /// Monday to Friday adjusted by the holiday registry.
    China
}

impl FromStr for Region {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "standard" => Ok(Region::Standard),
            "china" | "cn" => Ok(Region::China),
            _ => Err(CalendarError::UnknownRegion(s.to_owned()))
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Standard => write!(f, "standard"),
            Region::China => write!(f, "china")
        }
    }
}

/// Everything the classifier needs to decide a date besides the date itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkdayPolicy {
    region: Region,
    use_holidays: bool,
    custom_workdays: HashSet<NaiveDate>,
    custom_holidays: HashSet<NaiveDate>
}

impl Default for WorkdayPolicy {
    fn default() -> Self {
        WorkdayPolicy::new(Region::Standard)
    }
}

impl WorkdayPolicy {
    pub fn new(region: Region) -> WorkdayPolicy {
        WorkdayPolicy {
            region,
            use_holidays: true,
            custom_workdays: HashSet::new(),
            custom_holidays: HashSet::new()
        }
    }

    pub fn with_use_holidays(mut self, use_holidays: bool) -> WorkdayPolicy {
        self.use_holidays = use_holidays;
        self
    }

    pub fn with_custom_workdays(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> WorkdayPolicy {
        self.custom_workdays.extend(dates);
        self
    }

    pub fn with_custom_holidays(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> WorkdayPolicy {
        self.custom_holidays.extend(dates);
        self
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn use_holidays(&self) -> bool {
        self.use_holidays
    }

    /// True when classification has to consult the holiday registry.
    pub fn uses_registry(&self) -> bool {
        self.region == Region::China && self.use_holidays
    }

    #[inline]
    pub fn is_custom_workday(&self, d: NaiveDate) -> bool {
        self.custom_workdays.contains(&d)
    }

    #[inline]
    pub fn is_custom_holiday(&self, d: NaiveDate) -> bool {
        self.custom_holidays.contains(&d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_region_names() {
        assert_eq!("china".parse::<Region>(), Ok(Region::China));
        assert_eq!(" China ".parse::<Region>(), Ok(Region::China));
        assert_eq!("".parse::<Region>(), Ok(Region::Standard));
        assert_eq!("standard".parse::<Region>(), Ok(Region::Standard));
        assert_eq!(
            "mars".parse::<Region>(),
            Err(CalendarError::UnknownRegion("mars".to_owned()))
        );
    }

    #[test]
    fn registry_only_for_china_with_holidays() {
        assert!(WorkdayPolicy::new(Region::China).uses_registry());
        assert!(!WorkdayPolicy::new(Region::China).with_use_holidays(false).uses_registry());
        assert!(!WorkdayPolicy::new(Region::Standard).uses_registry());
    }
}
