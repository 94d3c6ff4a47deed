use std::fmt::Write;
use std::sync::Arc;

use chrono::{
    Datelike,
    NaiveDate
};
use chrono_tz::Tz;
use log::debug;
use serde_json::Value;

use crate::server::toolerror::ToolError;
use crate::server::toolrequest::{
    ToolRequest,
    WorkdayOptions
};
use crate::server::toolresult::{
    ContentBlock,
    ToolResult
};
use crate::time::calendar::holidayregistry::HolidayRegistry;
use crate::time::calendarerror::CalendarError;
use crate::time::dateformat::{
    DateFormat,
    DEFAULT_DATE_TIME_FORMAT
};
use crate::time::instant::{
    convert_time,
    current_time,
    local_timezone_name,
    relative_time,
    resolve_timezone,
    timestamp,
    today_in
};
use crate::time::isoweek::{
    days_in_month,
    iso_weeks_in_month,
    week_date_range,
    week_of_year
};
use crate::time::period::Period;
use crate::time::utility::{
    parse_date,
    weekday_name
};
use crate::time::workday::workdayclassification::WorkdayClassification;
use crate::time::workday::workdayclassifier::WorkdayClassifier;
use crate::time::workday::workdaypolicy::WorkdayPolicy;
use crate::time::workday::workdaystats::WorkdayStats;

/// Runs tool calls against the shared registry and renders the answers as
/// text content blocks.
pub struct Dispatcher {
    classifier: WorkdayClassifier,
    default_timezone: Option<String>
}

impl Dispatcher {
    pub fn new(registry: Arc<HolidayRegistry>, default_timezone: Option<String>) -> Dispatcher {
        Dispatcher {
            classifier: WorkdayClassifier::new(registry),
            default_timezone
        }
    }

    pub fn registry(&self) -> &Arc<HolidayRegistry> {
        self.classifier.registry()
    }

    /// Never fails: every error becomes a failure payload.
    pub async fn call(&self, name: &str, arguments: Option<Value>) -> ToolResult {
        let outcome = match ToolRequest::parse(name, arguments) {
            Ok(request) => self.execute(request).await,
            Err(e) => Err(e)
        };
        match outcome {
            Ok(content) => ToolResult::ok(content),
            Err(e) => {
                debug!("tool {name} failed: {e}");
                ToolResult::failure(e.to_string())
            }
        }
    }

    fn timezone_name(&self, requested: Option<&str>) -> String {
        requested
            .or(self.default_timezone.as_deref())
            .map(str::to_owned)
            .unwrap_or_else(local_timezone_name)
    }

    fn local_timezone(&self) -> Result<Tz, CalendarError> {
        resolve_timezone(&self.timezone_name(None))
    }

    fn date_or_today(&self, date: Option<&str>) -> Result<NaiveDate, CalendarError> {
        match date {
            Some(date_str) => parse_date(date_str),
            None => Ok(today_in(&self.local_timezone()?))
        }
    }

    async fn prepared_policy(&self, options: &WorkdayOptions) -> Result<WorkdayPolicy, ToolError> {
        let policy = options.policy()?;
        self.classifier.prepare(&policy, options.refresh_holidays).await;
        Ok(policy)
    }

    pub async fn execute(&self, request: ToolRequest) -> Result<Vec<ContentBlock>, ToolError> {
        let text = match request {
            ToolRequest::CurrentTime(args) => {
                let format = DateFormat::new(args.format.as_deref().unwrap_or(DEFAULT_DATE_TIME_FORMAT));
                let timezone = self.timezone_name(args.timezone.as_deref());
                let now = current_time(&format, Some(&timezone))?;
                format!(
                    "Current UTC time is {}, and the time in {} is {}.",
                    now.utc, now.timezone, now.local
                )
            },
            ToolRequest::RelativeTime(args) => relative_time(&args.time, &self.local_timezone()?)?,
            ToolRequest::DaysInMonth(args) => {
                let d = self.date_or_today(args.date.as_deref())?;
                format!("The number of days in month is {}.", days_in_month(d))
            },
            ToolRequest::GetTimestamp(args) => {
                let millis = timestamp(args.time.as_deref())?;
                match args.time {
                    Some(time) => format!("The timestamp of {} is {} ms.", time, millis),
                    None => format!("The current timestamp is {} ms.", millis)
                }
            },
            ToolRequest::ConvertTime(args) => {
                let converted = convert_time(&args.source_timezone, &args.target_timezone, args.time.as_deref())?;
                format!(
                    "Current time in {} is {}, and the time in {} is {}. The time difference is {} hours.",
                    args.source_timezone, converted.source_time,
                    args.target_timezone, converted.target_time,
                    converted.time_diff
                )
            },
            ToolRequest::GetWeekYear(args) => {
                let weeks = week_of_year(self.date_or_today(args.date.as_deref())?);
                format!(
                    "The week of the year is {}, and the isoWeek of the year is {}.",
                    weeks.week, weeks.iso_week
                )
            },
            ToolRequest::GetWeekDates(args) => {
                check_week(args.week)?;
                let range = week_date_range(args.year, args.week)?;
                format!(
                    "ISO week {} of {} runs from {} to {}.",
                    args.week, args.year, range.start_date, range.end_date
                )
            },
            ToolRequest::GetIsoWeeksInMonth(args) => {
                let weeks = iso_weeks_in_month(args.year, args.month)?;
                let list = weeks.weeks.iter().map(u32::to_string).collect::<Vec<_>>().join(", ");
                format!(
                    "{} {} contains {} ISO weeks: {} (first week {}, last week {}).",
                    weeks.month_name, weeks.year, weeks.week_count, list, weeks.first_week, weeks.last_week
                )
            },
            ToolRequest::GetWorkdays(args) => {
                check_week(args.week)?;
                let period = Period::Week { year: args.year, week: args.week };
                return self.list_workdays(period, &args.options).await;
            },
            ToolRequest::GetWorkdaysByMonth(args) => {
                let period = Period::Month { year: args.year, month: args.month };
                return self.list_workdays(period, &args.options).await;
            },
            ToolRequest::GetWorkdaysByQuarter(args) => {
                let period = Period::Quarter { year: args.year, quarter: args.quarter };
                return self.list_workdays(period, &args.options).await;
            },
            ToolRequest::GetWorkdaysByYear(args) => {
                let period = Period::Year { year: args.year };
                return self.list_workdays(period, &args.options).await;
            },
            ToolRequest::GetWorkdaysByRange(args) => {
                let (start_date, end_date) = args.dates()?;
                let period = Period::Range { start_date, end_date };
                return self.list_workdays(period, &args.options).await;
            },
            ToolRequest::GetWorkdayStats(args) => {
                let (start_date, end_date) = args.dates()?;
                let period = Period::Range { start_date, end_date };
                let policy = self.prepared_policy(&args.options).await?;
                let stats = self.classifier.stats(&period, &policy, &args.options.date_format())?;
                return Ok(vec![
                    ContentBlock::text(render_stats(&stats)),
                    ContentBlock::text(serde_json::to_string_pretty(&stats)?),
                ]);
            },
            ToolRequest::IsWorkday(args) => {
                let d = self.date_or_today(args.date.as_deref())?;
                let policy = self.prepared_policy(&args.options).await?;
                let day = self.classifier.classify(d, &policy, &args.options.date_format())?;
                return Ok(vec![
                    ContentBlock::text(render_is_workday(&day)),
                    ContentBlock::text(serde_json::to_string_pretty(&day)?),
                ]);
            },
            ToolRequest::AddWorkdays(args) => {
                let start = self.date_or_today(args.date.as_deref())?;
                let policy = self.prepared_policy(&args.options).await?;
                let target = self.classifier.add_workdays(start, args.days, &policy)?;
                let format = args.options.date_format();
                format!(
                    "{} workdays from {} is {} ({}).",
                    args.days,
                    format.format_date(start)?,
                    format.format_date(target)?,
                    weekday_name(target.weekday())
                )
            },
            ToolRequest::RefreshHolidays(_) => {
                let registry = self.registry();
                if !registry.refresh().await {
                    return Err(ToolError::RefreshFailed);
                }
                let synced = registry
                    .last_sync_time()
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                    .unwrap_or_else(|| "never".to_owned());
                format!("Holiday data refreshed: {} entries, last sync {}.", registry.len(), synced)
            }
        };
        Ok(vec![ContentBlock::text(text)])
    }

    async fn list_workdays(&self, period: Period, options: &WorkdayOptions) -> Result<Vec<ContentBlock>, ToolError> {
        let policy = self.prepared_policy(options).await?;
        let days = self.classifier.workdays(&period, &policy, &options.date_format())?;
        Ok(vec![
            ContentBlock::text(render_workdays(&period, &policy, &days)),
            ContentBlock::text(serde_json::to_string_pretty(&days)?),
        ])
    }
}

fn check_week(week: u32) -> Result<(), CalendarError> {
    if (1..=53).contains(&week) {
        Ok(())
    } else {
        Err(CalendarError::InvalidWeek(week))
    }
}

fn day_note(day: &WorkdayClassification) -> Option<String> {
    if day.is_custom_workday {
        return Some("custom workday".to_owned());
    }
    if day.is_custom_holiday {
        return Some("custom holiday".to_owned());
    }
    if let Some(info) = &day.workday_info {
        return Some(format!("makeup workday for {} ({})", info.name, info.chinese_name));
    }
    if let Some(info) = &day.in_lieu_day_info {
        return Some(format!("in-lieu day for {} ({})", info.name, info.chinese_name));
    }
    day.holiday_info
        .as_ref()
        .map(|info| format!("{} ({})", info.name, info.chinese_name))
}

fn render_workdays(period: &Period, policy: &WorkdayPolicy, days: &[WorkdayClassification]) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "Workdays for {} ({} calendar, {} days):", period, policy.region(), days.len());
    for day in days {
        let _ = write!(text, "{} ({})", day.date, day.day_name);
        if let Some(note) = day_note(day) {
            let _ = write!(text, " - {}", note);
        }
        text.push('\n');
    }
    text.truncate(text.trim_end().len());
    text
}

fn render_stats(stats: &WorkdayStats) -> String {
    format!(
        "From {} to {} ({} calendar): {} days, {} workdays, {} non-workdays, {} weekend days, {} holidays, {} in-lieu days, {} custom workdays, {} custom holidays.",
        stats.start_date,
        stats.end_date,
        stats.region,
        stats.total_days,
        stats.workdays,
        stats.non_workdays(),
        stats.weekends,
        stats.holidays,
        stats.in_lieu_days,
        stats.custom_workdays,
        stats.custom_holidays
    )
}

fn render_is_workday(day: &WorkdayClassification) -> String {
    let verdict = if day.is_workday { "is a workday" } else { "is not a workday" };
    match day_note(day) {
        Some(note) => format!("{} ({}) {}: {}.", day.date, day.day_name, verdict, note),
        None if day.is_weekend => format!("{} ({}) {}: weekend.", day.date, day.day_name, verdict),
        None => format!("{} ({}) {}.", day.date, day.day_name, verdict)
    }
}
