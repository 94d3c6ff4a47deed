use std::env;
use std::fmt;
use std::fs;

use chrono::{
    DateTime,
    NaiveDate,
    NaiveDateTime,
    NaiveTime,
    Offset,
    TimeZone,
    Utc
};
use chrono_tz::Tz;
use serde::Serialize;

use crate::time::calendarerror::CalendarError;
use crate::time::dateformat::{
    DateFormat,
    DEFAULT_DATE_TIME_FORMAT
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentTime {
    pub utc: String,
    pub local: String,
    pub timezone: String
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedTime {
    pub source_time: String,
    pub target_time: String,
    /// Target minus source UTC offset, in hours; fractional for zones such as
    /// Asia/Kolkata.
    pub time_diff: f64
}

pub fn resolve_timezone(name: &str) -> Result<Tz, CalendarError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| CalendarError::UnknownTimezone(name.to_owned()))
}

/// IANA name of the host timezone.
///
/// Looks at `TZ`, then `/etc/timezone`, then the `/etc/localtime` link
/// target, and settles on `UTC` when none of them names a known zone.
pub fn local_timezone_name() -> String {
    let candidates = [
        env::var("TZ").ok().map(|tz| tz.trim_start_matches(':').to_owned()),
        fs::read_to_string("/etc/timezone").ok().map(|s| s.trim().to_owned()),
        fs::read_link("/etc/localtime").ok().and_then(|target| {
            let target = target.to_string_lossy().into_owned();
            target
                .split_once("zoneinfo/")
                .map(|(_, zone)| zone.to_owned())
        }),
    ];
    candidates
        .into_iter()
        .flatten()
        .find(|name| name.parse::<Tz>().is_ok())
        .unwrap_or_else(|| "UTC".to_owned())
}

/// "Today" as seen from `timezone`.
pub fn today_in(timezone: &Tz) -> NaiveDate {
    Utc::now().with_timezone(timezone).date_naive()
}

/// Parses the wall-clock forms the tools accept: `YYYY-MM-DD`,
/// `YYYY-MM-DD HH:mm`, `YYYY-MM-DD HH:mm:ss` with optional `.SSS`, and the
/// same with a `T` separator.
pub fn parse_naive_date_time(time_str: &str) -> Result<NaiveDateTime, CalendarError> {
    const DATE_TIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    let trimmed = time_str.trim();
    DATE_TIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(trimmed, f).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .ok_or_else(|| CalendarError::InvalidDateTime(time_str.to_owned()))
}

/// Resolves `time_str` to an instant. Strings carrying an explicit offset
/// (RFC 3339) keep it; bare wall-clock strings are read in `timezone`.
pub fn parse_instant<Z: TimeZone + fmt::Display>(time_str: &str, timezone: &Z) -> Result<DateTime<Utc>, CalendarError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(time_str.trim()) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = parse_naive_date_time(time_str)?;
    localize(&naive, timezone, time_str).map(|dt| dt.with_timezone(&Utc))
}

// Ambiguous wall-clock times (DST fall-back) take the earlier instant.
fn localize<Z: TimeZone + fmt::Display>(naive: &NaiveDateTime, timezone: &Z, original: &str) -> Result<DateTime<Z>, CalendarError> {
    timezone
        .from_local_datetime(naive)
        .earliest()
        .ok_or_else(|| CalendarError::NonexistentLocalTime {
            time: original.to_owned(),
            timezone: timezone.to_string(),
        })
}

pub fn current_time_at(now: DateTime<Utc>, format: &DateFormat, timezone: &str) -> Result<CurrentTime, CalendarError> {
    let tz = resolve_timezone(timezone)?;
    Ok(CurrentTime {
        utc: format.format_datetime(&now)?,
        local: format.format_datetime(&now.with_timezone(&tz))?,
        timezone: tz.name().to_owned()
    })
}

/// Renders "now" in UTC and in `timezone` (host timezone when `None`).
pub fn current_time(format: &DateFormat, timezone: Option<&str>) -> Result<CurrentTime, CalendarError> {
    let timezone = timezone.map(str::to_owned).unwrap_or_else(local_timezone_name);
    current_time_at(Utc::now(), format, &timezone)
}

/// Milliseconds since the epoch of `time` read as UTC, or of now.
pub fn timestamp(time: Option<&str>) -> Result<i64, CalendarError> {
    match time {
        Some(time_str) => Ok(parse_instant(time_str, &Utc)?.timestamp_millis()),
        None => Ok(Utc::now().timestamp_millis())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// relative time
// ─────────────────────────────────────────────────────────────────────────────

const SECONDS_PER_MONTH: f64 = 30.436875 * 86_400.0;

/// Human readable distance between `then` and `now`: "2 hours ago",
/// "in a few seconds", "a year ago" ...
pub fn relative_time_between(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta_ms = (then - now).num_milliseconds();
    let seconds = (delta_ms.abs() as f64) / 1000.0;
    let minutes = seconds / 60.0;
    let hours = minutes / 60.0;
    let days = hours / 24.0;
    let months = seconds / SECONDS_PER_MONTH;
    let years = months / 12.0;

    let phrase = if seconds.round() <= 44.0 {
        "a few seconds".to_owned()
    } else if seconds.round() <= 89.0 {
        "a minute".to_owned()
    } else if minutes.round() <= 44.0 {
        format!("{} minutes", minutes.round())
    } else if minutes.round() <= 89.0 {
        "an hour".to_owned()
    } else if hours.round() <= 21.0 {
        format!("{} hours", hours.round())
    } else if hours.round() <= 35.0 {
        "a day".to_owned()
    } else if days.round() <= 25.0 {
        format!("{} days", days.round())
    } else if days.round() <= 45.0 {
        "a month".to_owned()
    } else if months.round() <= 10.0 {
        format!("{} months", months.round())
    } else if months.round() <= 17.0 {
        "a year".to_owned()
    } else {
        format!("{} years", years.round().max(2.0))
    };

    if delta_ms > 0 {
        format!("in {}", phrase)
    } else {
        format!("{} ago", phrase)
    }
}

/// Relative time of `time` from now, reading bare wall-clock input in
/// `timezone`.
pub fn relative_time(time: &str, timezone: &Tz) -> Result<String, CalendarError> {
    let then = parse_instant(time, timezone)?;
    Ok(relative_time_between(then, Utc::now()))
}

// ─────────────────────────────────────────────────────────────────────────────
// timezone conversion
// ─────────────────────────────────────────────────────────────────────────────

pub fn convert_time_at(
    source_timezone: &str,
    target_timezone: &str,
    time: Option<&str>,
    now: DateTime<Utc>,
) -> Result<ConvertedTime, CalendarError> {
    let source_tz = resolve_timezone(source_timezone)?;
    let target_tz = resolve_timezone(target_timezone)?;
    let instant = match time {
        Some(time_str) => parse_instant(time_str, &source_tz)?,
        None => now
    };
    let source_time = instant.with_timezone(&source_tz);
    let target_time = instant.with_timezone(&target_tz);

    let source_offset = source_time.offset().fix().local_minus_utc();
    let target_offset = target_time.offset().fix().local_minus_utc();
    let format = DateFormat::new(DEFAULT_DATE_TIME_FORMAT);

    Ok(ConvertedTime {
        source_time: format.format_datetime(&source_time)?,
        target_time: format.format_datetime(&target_time)?,
        time_diff: f64::from(target_offset - source_offset) / 3600.0
    })
}

/// Reads `time` (or now) as wall-clock time in `source_timezone` and renders
/// it in `target_timezone`.
pub fn convert_time(
    source_timezone: &str,
    target_timezone: &str,
    time: Option<&str>,
) -> Result<ConvertedTime, CalendarError> {
    convert_time_at(source_timezone, target_timezone, time, Utc::now())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn relative_time_thresholds() {
        let now = at(2025, 3, 23, 12, 0, 0);
        let cases = [
            (Duration::seconds(-10), "a few seconds ago"),
            (Duration::seconds(-60), "a minute ago"),
            (Duration::minutes(-5), "5 minutes ago"),
            (Duration::minutes(-60), "an hour ago"),
            (Duration::hours(-3), "3 hours ago"),
            (Duration::hours(-24), "a day ago"),
            (Duration::days(-3), "3 days ago"),
            (Duration::days(-31), "a month ago"),
            (Duration::days(-120), "4 months ago"),
            (Duration::days(-365), "a year ago"),
            (Duration::days(-365 * 3), "3 years ago"),
            (Duration::hours(2), "in 2 hours"),
            (Duration::days(2), "in 2 days"),
        ];
        for (delta, expected) in cases {
            assert_eq!(relative_time_between(now + delta, now), expected, "delta {:?}", delta);
        }
    }

    #[test]
    fn naive_parsing_accepts_common_shapes() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 23).unwrap().and_hms_opt(12, 30, 0).unwrap();
        assert_eq!(parse_naive_date_time("2025-03-23 12:30:00").unwrap(), expected);
        assert_eq!(parse_naive_date_time("2025-03-23T12:30:00").unwrap(), expected);
        assert_eq!(parse_naive_date_time("2025-03-23 12:30").unwrap(), expected);
        assert!(parse_naive_date_time("23/03/2025").is_err());
    }

    #[test]
    fn rfc3339_keeps_its_offset() {
        let instant = parse_instant("2025-03-23T20:30:00+08:00", &Utc).unwrap();
        assert_eq!(instant, at(2025, 3, 23, 12, 30, 0));
    }

    #[test]
    fn current_time_renders_both_zones() {
        let now = at(2025, 3, 23, 12, 30, 0);
        let result = current_time_at(now, &DateFormat::new("YYYY-MM-DD HH:mm:ss"), "Asia/Shanghai").unwrap();
        assert_eq!(result.utc, "2025-03-23 12:30:00");
        assert_eq!(result.local, "2025-03-23 20:30:00");
        assert_eq!(result.timezone, "Asia/Shanghai");
    }

    #[test]
    fn unknown_timezone_is_an_error() {
        assert_eq!(
            resolve_timezone("Mars/Olympus_Mons"),
            Err(CalendarError::UnknownTimezone("Mars/Olympus_Mons".to_owned()))
        );
    }

    #[test]
    fn fractional_offsets() {
        let result = convert_time_at("UTC", "Asia/Kolkata", Some("2025-03-23 12:30:00"), Utc::now()).unwrap();
        assert_eq!(result.target_time, "2025-03-23 18:00:00");
        assert_eq!(result.time_diff, 5.5);
    }

    #[test]
    fn daylight_saving_is_reflected_in_the_difference() {
        // New York is on EDT (UTC-4) after 2025-03-09
        let result = convert_time_at("America/New_York", "UTC", Some("2025-03-23 08:00:00"), Utc::now()).unwrap();
        assert_eq!(result.target_time, "2025-03-23 12:00:00");
        assert_eq!(result.time_diff, 4.0);
    }

    #[test]
    fn nonexistent_local_time_is_rejected() {
        // clocks jump from 02:00 to 03:00 in New York on 2025-03-09
        let err = convert_time_at("America/New_York", "UTC", Some("2025-03-09 02:30:00"), Utc::now()).unwrap_err();
        assert!(matches!(err, CalendarError::NonexistentLocalTime { .. }));
    }
}
