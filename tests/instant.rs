use chrono::{
    TimeZone,
    Utc
};
use chrono_tz::Asia::Shanghai;

use timeworkday::time::calendarerror::CalendarError;
use timeworkday::time::dateformat::DateFormat;
use timeworkday::time::instant::{
    convert_time,
    parse_instant,
    relative_time_between,
    timestamp
};

#[test]
fn utc_to_shanghai() {
    let converted = convert_time("UTC", "Asia/Shanghai", Some("2025-03-23 12:30:00")).unwrap();
    assert_eq!(converted.source_time, "2025-03-23 12:30:00");
    assert_eq!(converted.target_time, "2025-03-23 20:30:00");
    assert_eq!(converted.time_diff, 8.0);

    let back = convert_time("Asia/Shanghai", "UTC", Some("2025-03-23 20:30:00")).unwrap();
    assert_eq!(back.target_time, "2025-03-23 12:30:00");
    assert_eq!(back.time_diff, -8.0);
}

#[test]
fn timestamps_read_bare_times_as_utc() {
    assert_eq!(timestamp(Some("2025-03-23 12:30:00")).unwrap(), 1_742_733_000_000);
    assert_eq!(timestamp(Some("1970-01-01 00:00:00")).unwrap(), 0);
    assert!(matches!(timestamp(Some("yesterday")), Err(CalendarError::InvalidDateTime(_))));
    assert!(timestamp(None).unwrap() > 1_742_733_000_000);
}

#[test]
fn wall_clock_in_a_timezone() {
    let instant = parse_instant("2025-03-23 20:30:00", &Shanghai).unwrap();
    assert_eq!(instant, Utc.with_ymd_and_hms(2025, 3, 23, 12, 30, 0).unwrap());
}

#[test]
fn relative_time_is_symmetric() {
    let now = Utc.with_ymd_and_hms(2025, 3, 23, 12, 0, 0).unwrap();
    let earlier = Utc.with_ymd_and_hms(2025, 3, 23, 10, 0, 0).unwrap();
    assert_eq!(relative_time_between(earlier, now), "2 hours ago");
    assert_eq!(relative_time_between(now, earlier), "in 2 hours");
}

#[test]
fn twelve_hour_clock_format() {
    let evening = Shanghai.with_ymd_and_hms(2025, 3, 23, 20, 5, 9).unwrap();
    assert_eq!(DateFormat::new("h:mm A").format_datetime(&evening).unwrap(), "8:05 PM");
    assert_eq!(DateFormat::new("h:mm:ss A").format_datetime(&evening).unwrap(), "8:05:09 PM");
    assert_eq!(DateFormat::new("MM/DD/YY").format_datetime(&evening).unwrap(), "03/23/25");
}
