use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{
    json,
    Value
};

use crate::server::tooldefinition::is_known_tool;
use crate::server::toolerror::ToolError;
use crate::time::calendarerror::CalendarError;
use crate::time::dateformat::{
    DateFormat,
    CURRENT_TIME_FORMATS,
    DEFAULT_DATE_FORMAT,
    DEFAULT_DATE_TIME_FORMAT,
    WORKDAY_FORMATS
};
use crate::time::utility::{
    parse_date,
    parse_dates
};
use crate::time::workday::workdaypolicy::{
    Region,
    WorkdayPolicy
};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentTimeArgs {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RelativeTimeArgs {
    pub time: String
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OptionalDateArgs {
    #[serde(default)]
    pub date: Option<String>
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimestampArgs {
    #[serde(default)]
    pub time: Option<String>
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertTimeArgs {
    pub source_timezone: String,
    pub target_timezone: String,
    #[serde(default)]
    pub time: Option<String>
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeekArgs {
    pub year: i32,
    pub week: u32
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonthArgs {
    pub year: i32,
    pub month: u32
}

/// Options shared by every workday tool.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkdayOptions {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default = "default_true")]
    pub use_holidays: bool,
    #[serde(default)]
    pub custom_workdays: Vec<String>,
    #[serde(default)]
    pub custom_holidays: Vec<String>,
    #[serde(default)]
    pub refresh_holidays: bool
}

impl Default for WorkdayOptions {
    fn default() -> Self {
        WorkdayOptions {
            format: None,
            region: None,
            use_holidays: true,
            custom_workdays: Vec::new(),
            custom_holidays: Vec::new(),
            refresh_holidays: false
        }
    }
}

impl WorkdayOptions {
    pub fn policy(&self) -> Result<WorkdayPolicy, CalendarError> {
        let region: Region = self.region.as_deref().unwrap_or_default().parse()?;
        Ok(WorkdayPolicy::new(region)
            .with_use_holidays(self.use_holidays)
            .with_custom_workdays(parse_dates(&self.custom_workdays)?)
            .with_custom_holidays(parse_dates(&self.custom_holidays)?))
    }

    pub fn date_format(&self) -> DateFormat {
        DateFormat::new(self.format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeekWorkdayArgs {
    pub year: i32,
    pub week: u32,
    #[serde(flatten)]
    pub options: WorkdayOptions
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonthWorkdayArgs {
    pub year: i32,
    pub month: u32,
    #[serde(flatten)]
    pub options: WorkdayOptions
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuarterWorkdayArgs {
    pub year: i32,
    pub quarter: u32,
    #[serde(flatten)]
    pub options: WorkdayOptions
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct YearWorkdayArgs {
    pub year: i32,
    #[serde(flatten)]
    pub options: WorkdayOptions
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeWorkdayArgs {
    pub start_date: String,
    pub end_date: String,
    #[serde(flatten)]
    pub options: WorkdayOptions
}

impl RangeWorkdayArgs {
    pub fn dates(&self) -> Result<(NaiveDate, NaiveDate), CalendarError> {
        Ok((parse_date(&self.start_date)?, parse_date(&self.end_date)?))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IsWorkdayArgs {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(flatten)]
    pub options: WorkdayOptions
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddWorkdaysArgs {
    #[serde(default)]
    pub date: Option<String>,
    pub days: i32,
    #[serde(flatten)]
    pub options: WorkdayOptions
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct NoArgs {}

/// A `tools/call` request decoded into the tool it names and its typed
/// arguments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
pub enum ToolRequest {
    CurrentTime(CurrentTimeArgs),
    RelativeTime(RelativeTimeArgs),
    DaysInMonth(OptionalDateArgs),
    GetTimestamp(TimestampArgs),
    ConvertTime(ConvertTimeArgs),
    GetWeekYear(OptionalDateArgs),
    GetWeekDates(WeekArgs),
    GetIsoWeeksInMonth(MonthArgs),
    GetWorkdays(WeekWorkdayArgs),
    GetWorkdaysByMonth(MonthWorkdayArgs),
    GetWorkdaysByQuarter(QuarterWorkdayArgs),
    GetWorkdaysByYear(YearWorkdayArgs),
    GetWorkdaysByRange(RangeWorkdayArgs),
    GetWorkdayStats(RangeWorkdayArgs),
    IsWorkday(IsWorkdayArgs),
    AddWorkdays(AddWorkdaysArgs),
    RefreshHolidays(NoArgs)
}

impl ToolRequest {
    /// Decodes `{name, arguments}`. Missing or `null` arguments count as an
    /// empty object so tools without required fields can be called bare.
    pub fn parse(name: &str, arguments: Option<Value>) -> Result<ToolRequest, ToolError> {
        if !is_known_tool(name) {
            return Err(ToolError::UnknownTool(name.to_owned()));
        }
        let arguments = match arguments {
            None | Some(Value::Null) => json!({}),
            Some(arguments) => arguments
        };
        let request: ToolRequest = serde_json::from_value(json!({
            "name": name,
            "arguments": arguments
        }))
        .map_err(|e| ToolError::invalid_arguments(name, e))?;
        request.check_enums(name)?;
        Ok(request)
    }

    pub fn workday_options(&self) -> Option<&WorkdayOptions> {
        match self {
            ToolRequest::GetWorkdays(args) => Some(&args.options),
            ToolRequest::GetWorkdaysByMonth(args) => Some(&args.options),
            ToolRequest::GetWorkdaysByQuarter(args) => Some(&args.options),
            ToolRequest::GetWorkdaysByYear(args) => Some(&args.options),
            ToolRequest::GetWorkdaysByRange(args) | ToolRequest::GetWorkdayStats(args) => Some(&args.options),
            ToolRequest::IsWorkday(args) => Some(&args.options),
            ToolRequest::AddWorkdays(args) => Some(&args.options),
            _ => None
        }
    }

    // format strings are closed enums in the published schemas
    fn check_enums(&self, name: &str) -> Result<(), ToolError> {
        if let ToolRequest::CurrentTime(args) = self {
            let format = args.format.as_deref().unwrap_or(DEFAULT_DATE_TIME_FORMAT);
            if !CURRENT_TIME_FORMATS.contains(&format) {
                return Err(ToolError::invalid_arguments(name, format!("unsupported format '{format}'")));
            }
        }
        if let Some(format) = self.workday_options().and_then(|options| options.format.as_deref()) {
            if !WORKDAY_FORMATS.contains(&format) {
                return Err(ToolError::invalid_arguments(name, format!("unsupported format '{format}'")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_tagged_arguments() {
        let request = ToolRequest::parse("get_week_dates", Some(json!({"year": 2025, "week": 12}))).unwrap();
        assert_eq!(request, ToolRequest::GetWeekDates(WeekArgs { year: 2025, week: 12 }));
    }

    #[test]
    fn missing_arguments_default_to_empty_object() {
        assert_eq!(
            ToolRequest::parse("days_in_month", None).unwrap(),
            ToolRequest::DaysInMonth(OptionalDateArgs { date: None })
        );
        assert_eq!(
            ToolRequest::parse("refresh_holidays", Some(Value::Null)).unwrap(),
            ToolRequest::RefreshHolidays(NoArgs {})
        );
    }

    #[test]
    fn workday_options_are_flattened() {
        let request = ToolRequest::parse(
            "get_workdays_by_month",
            Some(json!({
                "year": 2025,
                "month": 5,
                "region": "china",
                "useHolidays": false,
                "customWorkdays": ["2025-05-03"],
                "format": "YYYY年MM月DD日"
            }))
        )
        .unwrap();
        let ToolRequest::GetWorkdaysByMonth(args) = request else {
            panic!("wrong variant");
        };
        assert_eq!(args.month, 5);
        assert!(!args.options.use_holidays);
        let policy = args.options.policy().unwrap();
        assert_eq!(policy.region(), Region::China);
        assert!(policy.is_custom_workday(NaiveDate::from_ymd_opt(2025, 5, 3).unwrap()));
    }

    #[test]
    fn shape_errors_name_the_tool() {
        let err = ToolRequest::parse("get_week_dates", Some(json!({"year": "2025", "week": 12}))).unwrap_err();
        assert!(err.to_string().starts_with("Invalid arguments for tool: [get_week_dates]"));

        let err = ToolRequest::parse("get_workdays", Some(json!({"year": 2025, "week": 1, "format": "DD.MM.YYYY"}))).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));

        let err = ToolRequest::parse("current_time", Some(json!({"format": "HH"}))).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[test]
    fn unknown_tool() {
        assert_eq!(
            ToolRequest::parse("launch_rocket", None).unwrap_err().to_string(),
            "Unknown tool: launch_rocket"
        );
    }

    #[test]
    fn bad_custom_dates_are_domain_errors() {
        let options = WorkdayOptions {
            custom_holidays: vec!["2025-02-30".to_owned()],
            ..WorkdayOptions::default()
        };
        assert_eq!(options.policy(), Err(CalendarError::InvalidDate("2025-02-30".to_owned())));

        let options = WorkdayOptions {
            custom_workdays: vec!["2025-05-03 junk".to_owned()],
            ..WorkdayOptions::default()
        };
        assert_eq!(options.policy(), Err(CalendarError::InvalidDate("2025-05-03 junk".to_owned())));
    }
}
